use crate::areas::repository::Repository;
use crate::artifacts::revision::resolver::RevisionResolver;
use crate::server::config::Config;
use crate::server::error::StartupError;
use crate::server::listing::ListingTemplate;
use std::sync::Arc;

/// Everything a request needs, built once at startup
///
/// Cloned into every request; clones share the same repository and template.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub repository: Arc<Repository>,
    pub resolver: Arc<RevisionResolver>,
    pub listing: Arc<ListingTemplate>,
    pub domain: Option<String>,
}

impl ServerContext {
    pub fn new(repository: Repository, listing: ListingTemplate, domain: Option<String>) -> Self {
        ServerContext {
            repository: Arc::new(repository),
            resolver: Arc::new(RevisionResolver::default()),
            listing: Arc::new(listing),
            domain,
        }
    }

    /// Open the repository and load the listing template named in `config`
    pub fn load(config: &Config) -> Result<Self, StartupError> {
        let repository =
            Repository::open(&config.repo).map_err(|cause| StartupError::RepositoryOpen {
                path: config.repo.display().to_string(),
                cause,
            })?;
        let listing = ListingTemplate::load(&config.tmpl)?;

        tracing::info!(
            repository = %repository.path().display(),
            template = %config.tmpl.display(),
            domain = config.domain.as_deref(),
            "server context loaded"
        );

        Ok(Self::new(repository, listing, config.domain.clone()))
    }
}
