//! Git blob object
//!
//! Blobs store file content in Git. They contain only the raw file data,
//! without any metadata like filename or permissions (those are stored in trees).
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Read};

/// Git blob object representing file content
///
/// Keeps the raw bytes; decoding to text is deferred to [`Blob::contents`] so
/// that a missing file and an undecodable one stay distinguishable.
#[derive(Debug, Clone, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    /// Content decoded as UTF-8 text
    pub fn contents(&self) -> anyhow::Result<String> {
        String::from_utf8(self.content.to_vec()).context("blob content is not valid UTF-8")
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type() -> ObjectType {
        ObjectType::Blob
    }
}
