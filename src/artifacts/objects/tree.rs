//! Git tree object
//!
//! Trees represent directory snapshots in Git. They contain entries for files (blobs),
//! subdirectories (other trees) and submodules, along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Reading
//!
//! The body is kept as-is and parsed lazily by [`TreeWalker`], one entry per
//! `next()` call, in the order the entries were written.

use crate::areas::database::Database;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Cursor, Read};
use std::iter::FusedIterator;

/// Git tree object representing a directory snapshot
#[derive(Debug, Clone, new)]
pub struct Tree {
    /// Undecoded entries, shared with any walker created from this tree
    content: Bytes,
}

impl Tree {
    /// Enumerate the immediate children of this tree
    pub fn walk(&self) -> TreeWalker {
        TreeWalker::new(self.content.clone())
    }

    /// Find the immediate child named `name`
    pub fn entry(&self, name: &str) -> anyhow::Result<Option<DatabaseEntry>> {
        for entry in self.walk() {
            let (entry_name, entry) = entry?;
            if entry_name == name {
                return Ok(Some(entry));
            }
        }

        Ok(None)
    }

    /// Descend to the tree at `path`, relative to this tree
    ///
    /// Empty path components are ignored, so `""` yields this tree itself.
    pub fn subtree(&self, database: &Database, path: &str) -> anyhow::Result<Tree> {
        let components = path_components(path).collect::<Vec<_>>();
        self.descend(database, &components)
            .with_context(|| format!("directory not found: {path}"))
    }

    /// Locate the blob at `path`, relative to this tree
    pub fn file(&self, database: &Database, path: &str) -> anyhow::Result<Blob> {
        let components = path_components(path).collect::<Vec<_>>();
        let (name, parents) = components
            .split_last()
            .context("file not found: empty path")?;

        let parent = self
            .descend(database, parents)
            .with_context(|| format!("file not found: {path}"))?;
        let entry = parent
            .entry(name)?
            .with_context(|| format!("file not found: {path}"))?;

        if !entry.mode.is_blob() {
            anyhow::bail!("not a file: {path}");
        }

        database
            .parse_object_as_blob(&entry.oid)?
            .with_context(|| format!("object {} is not a blob", entry.oid))
    }

    fn descend(&self, database: &Database, components: &[&str]) -> anyhow::Result<Tree> {
        let mut tree = self.clone();

        for component in components {
            let entry = tree
                .entry(component)?
                .with_context(|| format!("no entry named {component}"))?;

            if !entry.is_tree() {
                anyhow::bail!("{component} is not a directory");
            }

            tree = database
                .parse_object_as_tree(&entry.oid)?
                .with_context(|| format!("object {} is not a tree", entry.oid))?;
        }

        Ok(tree)
    }
}

fn path_components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|component| !component.is_empty())
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Tree {
    fn object_type() -> ObjectType {
        ObjectType::Tree
    }
}

/// One-pass iterator over the entries of a tree object
///
/// Owns (a shared handle to) the tree body and drops it with the walker, whether
/// the walk ran to completion or was abandoned early. A malformed entry is
/// yielded once as an error, after which the walker is exhausted.
#[derive(Debug)]
pub struct TreeWalker {
    reader: Cursor<Bytes>,
    finished: bool,
    // Reuse scratch buffers to reduce allocs
    mode_bytes: Vec<u8>,
    name_bytes: Vec<u8>,
}

impl TreeWalker {
    fn new(content: Bytes) -> Self {
        TreeWalker {
            reader: Cursor::new(content),
            finished: false,
            mode_bytes: Vec::new(),
            name_bytes: Vec::new(),
        }
    }

    fn read_entry(&mut self) -> anyhow::Result<Option<(String, DatabaseEntry)>> {
        self.mode_bytes.clear();
        // Read "mode " (space-delimited)
        let n = self.reader.read_until(b' ', &mut self.mode_bytes)?;
        if n == 0 {
            return Ok(None); // clean EOF: no more entries
        }
        if self.mode_bytes.pop() != Some(b' ') {
            anyhow::bail!("unexpected EOF in mode");
        }

        let mode_str = std::str::from_utf8(&self.mode_bytes)?;
        let mode = EntryMode::from_octal_str(mode_str)?;

        // Read "name\0"
        self.name_bytes.clear();
        self.reader.read_until(b'\0', &mut self.name_bytes)?;
        if self.name_bytes.pop() != Some(b'\0') {
            anyhow::bail!("unexpected EOF in name");
        }
        let name = std::str::from_utf8(&self.name_bytes)?.to_owned();

        let oid = ObjectId::read_h40_from(&mut self.reader)
            .context("unexpected EOF in object id")?;

        Ok(Some((name, DatabaseEntry::new(oid, mode))))
    }
}

impl Iterator for TreeWalker {
    type Item = anyhow::Result<(String, DatabaseEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for TreeWalker {}
