use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// An annotated tag exists but does not annotate a commit
    #[error("Tag {tag} is not associated with a commit: {cause:#}")]
    AnnotatedTagDereference { tag: String, cause: anyhow::Error },

    /// Every strategy in the chain declined the identifier
    #[error("No branch, tag or commit named {identifier}")]
    NoMatch { identifier: String },
}
