use crate::artifacts::objects::object_id::ObjectId;

/// Commit reference produced by revision resolution
///
/// Usually a commit hash read from a reference, but a literal identifier is
/// passed through untouched, so the value is only checked when the commit is
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRevision(String);

impl ResolvedRevision {
    pub fn literal(identifier: &str) -> Self {
        Self(identifier.to_string())
    }

    /// Interpret the revision as an object id
    pub fn to_object_id(&self) -> anyhow::Result<ObjectId> {
        ObjectId::try_parse(self.0.clone())
    }
}

impl From<ObjectId> for ResolvedRevision {
    fn from(oid: ObjectId) -> Self {
        Self(oid.as_ref().to_string())
    }
}

impl AsRef<str> for ResolvedRevision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResolvedRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
