use crate::artifacts::refs::{HEADS_PREFIX, INVALID_REF_NAME, TAGS_PREFIX};
use derive_new::new;

/// Full path of a reference relative to the git directory, e.g. `refs/heads/main`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SymRefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short reference name as a user would type it, e.g. `main` or `v1.0.0`
///
/// Validated against git's `check-ref-format` rules, which also keeps the name
/// from escaping the refs directory when joined onto a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("ref name cannot be empty");
        }

        let re = INVALID_REF_NAME
            .as_ref()
            .map_err(|err| anyhow::anyhow!("invalid ref name regex: {err}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid ref name: {}", name);
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_branch(&self) -> SymRefName {
        SymRefName::new(format!("{HEADS_PREFIX}{}", self.0))
    }

    pub fn as_tag(&self) -> SymRefName {
        SymRefName::new(format!("{TAGS_PREFIX}{}", self.0))
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
