//! Git commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! Only the root tree is kept; history and metadata are never needed to serve
//! a snapshot.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//! [other headers, e.g. gpgsig, possibly continued on lines starting with ' ']
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use derive_new::new;
use std::io::{BufRead, Read};

/// Git commit object
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Commit {
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
}

impl Commit {
    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        // commit messages may carry a non-UTF-8 `encoding` header; headers are ASCII
        let content = String::from_utf8_lossy(&content);
        let headers = content
            .split_once("\n\n")
            .map_or(content.as_ref(), |(headers, _)| headers);

        // `tree` is always the first header, but a continuation line of a later
        // header (e.g. `gpgsig`) must never be mistaken for it
        let tree_oid = headers
            .lines()
            .take_while(|line| !line.starts_with(' '))
            .find_map(|line| line.strip_prefix("tree "))
            .context("invalid commit object: missing tree line")?;

        Ok(Self::new(ObjectId::try_parse(tree_oid.to_string())?))
    }
}

impl Object for Commit {
    fn object_type() -> ObjectType {
        ObjectType::Commit
    }
}
