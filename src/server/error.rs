use thiserror::Error;

/// Fatal errors raised before the server starts listening
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open git repository {path}: {cause:#}")]
    RepositoryOpen { path: String, cause: anyhow::Error },

    #[error("failed to load listing template {path}: {cause:#}")]
    TemplateLoad { path: String, cause: anyhow::Error },
}

/// Directory listing could not be rendered
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("error executing template: {cause}")]
    TemplateRender { cause: minijinja::Error },
}
