use crate::areas::repository::Repository;
use crate::artifacts::revision::error::ResolveError;
use crate::artifacts::revision::resolved_revision::ResolvedRevision;
use crate::artifacts::revision::strategy::{
    BranchStrategy, LiteralStrategy, ResolutionStrategy, TagStrategy,
};

/// Ordered chain of resolution strategies
#[derive(Debug)]
pub struct RevisionResolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl Default for RevisionResolver {
    /// Branch, then tag, then literal hash
    fn default() -> Self {
        Self::new(vec![
            Box::new(BranchStrategy),
            Box::new(TagStrategy),
            Box::new(LiteralStrategy),
        ])
    }
}

impl RevisionResolver {
    pub fn new(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        RevisionResolver { strategies }
    }

    /// Resolve `identifier` with the first strategy that accepts it
    pub fn resolve(
        &self,
        repository: &Repository,
        identifier: &str,
    ) -> Result<ResolvedRevision, ResolveError> {
        for strategy in &self.strategies {
            if let Some(revision) = strategy.resolve(repository, identifier)? {
                tracing::debug!(
                    identifier,
                    %revision,
                    strategy = strategy.name(),
                    "revision resolved"
                );
                return Ok(revision);
            }
        }

        Err(ResolveError::NoMatch {
            identifier: identifier.to_string(),
        })
    }
}
