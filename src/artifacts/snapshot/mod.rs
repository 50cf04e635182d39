//! Reading content out of a resolved revision
//!
//! - `error`: per-step failures (commit, tree, path, file, decoding)
//! - `file_reader`: full text of one file
//! - `tree_reader`: one-level directory listings

use crate::areas::repository::Repository;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::revision::resolved_revision::ResolvedRevision;
use crate::artifacts::snapshot::error::SnapshotError;
use anyhow::Context;

pub mod error;
pub mod file_reader;
pub mod tree_reader;

/// Load the root tree of the commit `revision` points at
fn root_tree(
    repository: &Repository,
    revision: &ResolvedRevision,
) -> Result<Tree, SnapshotError> {
    let database = repository.database();

    let commit = revision
        .to_object_id()
        .and_then(|oid| {
            database
                .parse_object_as_commit(&oid)?
                .with_context(|| format!("object {oid} is not a commit"))
        })
        .map_err(|cause| SnapshotError::CommitNotFound {
            revision: revision.to_string(),
            cause,
        })?;

    let tree_oid = commit.tree_oid();
    database
        .parse_object_as_tree(tree_oid)
        .and_then(|tree| tree.with_context(|| format!("object {tree_oid} is not a tree")))
        .map_err(|cause| SnapshotError::TreeNotFound {
            revision: revision.to_string(),
            cause,
        })
}
