use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::ref_name::RefName;
use crate::artifacts::revision::error::ResolveError;
use crate::artifacts::revision::resolved_revision::ResolvedRevision;

/// One way of interpreting a revision identifier
///
/// `Ok(None)` hands the identifier to the next strategy in the chain, an error
/// stops the chain.
pub trait ResolutionStrategy: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(
        &self,
        repository: &Repository,
        identifier: &str,
    ) -> Result<Option<ResolvedRevision>, ResolveError>;
}

/// Parse `identifier` as a ref name, or `None` if git would reject it as one
fn ref_name(identifier: &str) -> Option<RefName> {
    match RefName::try_parse(identifier.to_string()) {
        Ok(name) => Some(name),
        Err(err) => {
            tracing::debug!(identifier, error = %err, "not a ref name");
            None
        }
    }
}

/// Lookup errors (unreadable or corrupt ref files) count as "no such ref"
fn found(
    kind: &str,
    name: &RefName,
    lookup: anyhow::Result<Option<ObjectId>>,
) -> Option<ObjectId> {
    match lookup {
        Ok(oid) => oid,
        Err(err) => {
            tracing::debug!(%name, error = ?err, "{kind} lookup failed");
            None
        }
    }
}

/// `refs/heads/<identifier>`
#[derive(Debug, Default, Clone, Copy)]
pub struct BranchStrategy;

impl ResolutionStrategy for BranchStrategy {
    fn name(&self) -> &'static str {
        "branch"
    }

    fn resolve(
        &self,
        repository: &Repository,
        identifier: &str,
    ) -> Result<Option<ResolvedRevision>, ResolveError> {
        let Some(name) = ref_name(identifier) else {
            return Ok(None);
        };

        let oid = found("branch", &name, repository.refs().read_branch(&name));
        Ok(oid.map(ResolvedRevision::from))
    }
}

/// `refs/tags/<identifier>`, dereferencing annotated tags to their commit
#[derive(Debug, Default, Clone, Copy)]
pub struct TagStrategy;

impl ResolutionStrategy for TagStrategy {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn resolve(
        &self,
        repository: &Repository,
        identifier: &str,
    ) -> Result<Option<ResolvedRevision>, ResolveError> {
        let Some(name) = ref_name(identifier) else {
            return Ok(None);
        };
        let Some(oid) = found("tag", &name, repository.refs().read_tag(&name)) else {
            return Ok(None);
        };

        match repository.database().parse_object_as_tag(&oid) {
            Ok(Some(tag)) => {
                let commit = tag
                    .commit()
                    .map_err(|cause| ResolveError::AnnotatedTagDereference {
                        tag: identifier.to_string(),
                        cause,
                    })?;
                Ok(Some(commit.clone().into()))
            }
            // not a tag object, or no object at all: a lightweight tag
            Ok(None) | Err(_) => Ok(Some(oid.into())),
        }
    }
}

/// The identifier itself, taken as a commit hash
///
/// Never validated here; a bad hash fails when the commit is loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralStrategy;

impl ResolutionStrategy for LiteralStrategy {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn resolve(
        &self,
        _repository: &Repository,
        identifier: &str,
    ) -> Result<Option<ResolvedRevision>, ResolveError> {
        Ok(Some(ResolvedRevision::literal(identifier)))
    }
}
