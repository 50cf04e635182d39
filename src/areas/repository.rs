use crate::areas::database::Database;
use crate::areas::refs::Refs;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Read-only handle to a git repository
///
/// Opened once at startup and shared by every request. The only state that
/// changes afterwards is the list of known packs, kept behind a lock inside
/// [`Database`].
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    git_dir: Box<Path>,
    database: Database,
    refs: Refs,
}

impl Repository {
    /// Open the repository at `path`
    ///
    /// `path` may be a work tree containing `.git` (a directory, or a file with a
    /// `gitdir:` pointer as used by linked work trees and submodules) or a bare
    /// repository.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to access {}", path.display()))?;
        let git_dir = Self::find_git_dir(&path)?;

        let database = Database::new(git_dir.join("objects").into_boxed_path());
        let refs = Refs::new(git_dir.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            git_dir: git_dir.into_boxed_path(),
            database,
            refs,
        })
    }

    fn find_git_dir(path: &Path) -> anyhow::Result<PathBuf> {
        let dot_git = path.join(".git");

        if dot_git.is_dir() {
            return Ok(dot_git);
        }

        if dot_git.is_file() {
            let content = std::fs::read_to_string(&dot_git)
                .with_context(|| format!("Unable to read {}", dot_git.display()))?;
            let target = content
                .trim()
                .strip_prefix("gitdir: ")
                .with_context(|| format!("Invalid gitdir file {}", dot_git.display()))?;

            let git_dir = path.join(target);
            if Self::is_git_dir(&git_dir) {
                return Ok(git_dir);
            }
            anyhow::bail!("{} does not point to a git directory", dot_git.display());
        }

        if Self::is_git_dir(path) {
            return Ok(path.to_path_buf());
        }

        anyhow::bail!("{} is not a git repository", path.display())
    }

    fn is_git_dir(path: &Path) -> bool {
        path.join("objects").is_dir() && path.join("refs").is_dir() && path.join("HEAD").is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
