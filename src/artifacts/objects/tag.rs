//! Git annotated tag object
//!
//! Annotated tags are objects of their own that point at another object,
//! usually a commit. Lightweight tags have no such object: the reference under
//! `refs/tags/` points at the commit directly.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! tag <size>\0
//! object <target-sha>
//! type <target-type>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Tag {
    /// Object the tag points at
    target: ObjectId,
    /// Type of the object the tag points at
    target_type: ObjectType,
    /// Tag name as recorded in the object
    name: String,
}

impl Tag {
    /// The commit this tag annotates
    ///
    /// Fails when the tag points at anything other than a commit, including
    /// another tag.
    pub fn commit(&self) -> anyhow::Result<&ObjectId> {
        match self.target_type {
            ObjectType::Commit => Ok(&self.target),
            ref other => anyhow::bail!(
                "tag {} points to a {}, not a commit ({})",
                self.name,
                other,
                self.target.to_short_oid()
            ),
        }
    }
}

impl Unpackable for Tag {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut target = None;
        let mut target_type = None;
        let mut name = String::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                break; // message follows
            }

            if let Some(oid) = line.strip_prefix("object ") {
                target = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(object_type) = line.strip_prefix("type ") {
                target_type = Some(ObjectType::try_from(object_type)?);
            } else if let Some(tag_name) = line.strip_prefix("tag ") {
                name = tag_name.to_string();
            }
        }

        Ok(Self::new(
            target.context("invalid tag object: missing object line")?,
            target_type.context("invalid tag object: missing type line")?,
            name,
        ))
    }
}

impl Object for Tag {
    fn object_type() -> ObjectType {
        ObjectType::Tag
    }
}
