//! Git references (branches, tags)
//!
//! This module reads Git references, which are human-readable names pointing to objects.
//! References can be:
//! - Direct: Containing a SHA-1
//! - Symbolic: Pointing to another reference (e.g., `ref: refs/heads/master`)
//!
//! ## Storage
//!
//! A reference lives either in its own file under `refs/` (loose) or as a line in
//! `packed-refs`. Loose files win over packed entries, as in git.
//!
//! ```text
//! # pack-refs with: peeled fully-peeled sorted
//! <sha1> refs/heads/main
//! <sha1> refs/tags/v1.0.0
//! ^<sha1 of the commit the annotated tag above points to>
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::ref_name::{RefName, SymRefName};
use anyhow::Context;
use derive_new::new;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Git references reader
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

static SYMREF: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(SYMREF_REGEX));

/// Symbolic reference chains longer than this are treated as broken
const MAX_SYMREF_DEPTH: usize = 5;

/// Internal representation of a reference value
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = SYMREF
            .as_ref()
            .map_err(|err| anyhow::anyhow!("invalid symref regex: {err}"))?
            .captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Read the object ID of `refs/heads/<name>`
    ///
    /// # Returns
    ///
    /// Some(ObjectId) if the branch exists, None otherwise
    pub fn read_branch(&self, name: &RefName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(&name.as_branch())
    }

    /// Read the object ID of `refs/tags/<name>`
    ///
    /// For annotated tags this is the ID of the tag object, not of the commit.
    pub fn read_tag(&self, name: &RefName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(&name.as_tag())
    }

    /// Read a reference by its full name, following symbolic references
    pub fn read_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(sym_ref_name, 0)
    }

    fn read_symref(
        &self,
        sym_ref_name: &SymRefName,
        depth: usize,
    ) -> anyhow::Result<Option<ObjectId>> {
        if depth > MAX_SYMREF_DEPTH {
            anyhow::bail!("too many levels of symbolic refs at {}", sym_ref_name);
        }

        let ref_path = self.path.join(sym_ref_name.as_ref_path());

        match SymRefOrOid::read_symref_or_oid(&ref_path)? {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(&sym_ref_name, depth + 1)
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => self.read_packed_ref(sym_ref_name),
        }
    }

    fn read_packed_ref(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        let packed_refs_path = self.packed_refs_path();
        if !packed_refs_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&packed_refs_path)
            .with_context(|| format!("failed to read {:?}", packed_refs_path))?;

        content
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
            .filter_map(|line| line.split_once(' '))
            .find(|(_, name)| name.trim() == sym_ref_name.as_ref_path())
            .map(|(oid, _)| ObjectId::try_parse(oid.to_string()))
            .transpose()
    }

    fn packed_refs_path(&self) -> Box<Path> {
        self.path.join("packed-refs").into_boxed_path()
    }
}
