use thiserror::Error;

/// Failure to read from a revision, one variant per lookup step
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Commit not found: {revision}: {cause:#}")]
    CommitNotFound { revision: String, cause: anyhow::Error },

    #[error("Could not locate tree associated with commit {revision}: {cause:#}")]
    TreeNotFound { revision: String, cause: anyhow::Error },

    #[error("Could not locate path {path} in commit {revision}: {cause:#}")]
    PathNotFound {
        revision: String,
        path: String,
        cause: anyhow::Error,
    },

    #[error("Could not locate file {path} in commit {revision}: {cause:#}")]
    FileNotFound {
        revision: String,
        path: String,
        cause: anyhow::Error,
    },

    #[error("Could not output file {path} in commit {revision}: {cause:#}")]
    ContentDecode {
        revision: String,
        path: String,
        cause: anyhow::Error,
    },

    #[error("Malformed tree in commit {revision}: {cause:#}")]
    MalformedTree { revision: String, cause: anyhow::Error },
}
