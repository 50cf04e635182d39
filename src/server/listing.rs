use crate::artifacts::snapshot::tree_reader::TreeEntry;
use crate::server::error::{ListingError, StartupError};
use anyhow::Context;
use minijinja::Environment;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use std::path::Path;

/// Characters escaped when a file name becomes a relative link
const LINK_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Directory listing template, loaded once at startup
///
/// The template sees `path` (the requested directory) and `files`, a list of
/// `{name, is_directory, href}`. Templates named `*.html` are auto-escaped.
#[derive(Debug)]
pub struct ListingTemplate {
    environment: Environment<'static>,
    name: String,
}

#[derive(Debug, Serialize)]
struct ListingEntry<'a> {
    name: &'a str,
    is_directory: bool,
    href: String,
}

impl<'a> From<&'a TreeEntry> for ListingEntry<'a> {
    fn from(entry: &'a TreeEntry) -> Self {
        let mut href = utf8_percent_encode(&entry.name, LINK_SEGMENT).to_string();
        if entry.is_directory {
            href.push('/');
        }

        ListingEntry {
            name: &entry.name,
            is_directory: entry.is_directory,
            href,
        }
    }
}

impl ListingTemplate {
    /// Read and compile the template at `path`
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let load = || -> anyhow::Result<Self> {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Unable to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "directory.html".to_string());

            Self::from_source(name, source)
        };

        load().map_err(|cause| StartupError::TemplateLoad {
            path: path.display().to_string(),
            cause,
        })
    }

    /// Compile a template from memory; `name` decides the escaping mode
    pub fn from_source(name: String, source: String) -> anyhow::Result<Self> {
        let mut environment = Environment::new();
        environment
            .add_template_owned(name.clone(), source)
            .context("Invalid listing template")?;

        Ok(ListingTemplate { environment, name })
    }

    /// Render the listing of `path`
    pub fn render(&self, path: &str, entries: &[TreeEntry]) -> Result<String, ListingError> {
        let files = entries.iter().map(ListingEntry::from).collect::<Vec<_>>();

        self.environment
            .get_template(&self.name)
            .and_then(|template| template.render(minijinja::context! { path, files }))
            .map_err(|cause| ListingError::TemplateRender { cause })
    }
}
