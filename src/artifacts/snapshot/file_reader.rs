use crate::areas::repository::Repository;
use crate::artifacts::revision::resolved_revision::ResolvedRevision;
use crate::artifacts::snapshot::error::SnapshotError;
use crate::artifacts::snapshot::root_tree;

/// Read the whole file at `path` as UTF-8 text
pub fn read_file(
    repository: &Repository,
    revision: &ResolvedRevision,
    path: &str,
) -> Result<String, SnapshotError> {
    let root = root_tree(repository, revision)?;

    let blob = root
        .file(repository.database(), path)
        .map_err(|cause| SnapshotError::FileNotFound {
            revision: revision.to_string(),
            path: path.to_string(),
            cause,
        })?;

    blob.contents()
        .map_err(|cause| SnapshotError::ContentDecode {
            revision: revision.to_string(),
            path: path.to_string(),
            cause,
        })
}
