use crate::areas::repository::Repository;
use crate::artifacts::objects::tree::TreeWalker;
use crate::artifacts::revision::resolved_revision::ResolvedRevision;
use crate::artifacts::snapshot::error::SnapshotError;
use crate::artifacts::snapshot::root_tree;
use derive_new::new;
use serde::Serialize;
use std::iter::FusedIterator;

/// One immediate child of a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct TreeEntry {
    pub name: String,
    pub is_directory: bool,
}

/// List the immediate children of the directory at `path`
///
/// An empty `path` lists the root of the snapshot. Entries come out lazily in
/// the order they are stored in the tree object.
pub fn list_tree(
    repository: &Repository,
    revision: &ResolvedRevision,
    path: &str,
) -> Result<TreeListing, SnapshotError> {
    let root = root_tree(repository, revision)?;

    let tree = if path.is_empty() {
        root
    } else {
        root.subtree(repository.database(), path)
            .map_err(|cause| SnapshotError::PathNotFound {
                revision: revision.to_string(),
                path: path.to_string(),
                cause,
            })?
    };

    Ok(TreeListing {
        revision: revision.clone(),
        walker: tree.walk(),
    })
}

/// Lazy listing of one directory, see [`list_tree`]
#[derive(Debug)]
pub struct TreeListing {
    revision: ResolvedRevision,
    walker: TreeWalker,
}

impl Iterator for TreeListing {
    type Item = Result<TreeEntry, SnapshotError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.walker.next()?;

        Some(
            entry
                .map(|(name, entry)| TreeEntry::new(name, entry.is_directory()))
                .map_err(|cause| SnapshotError::MalformedTree {
                    revision: self.revision.to_string(),
                    cause,
                }),
        )
    }
}

impl FusedIterator for TreeListing {}
