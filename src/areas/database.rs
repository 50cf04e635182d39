use crate::areas::pack::Packs;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Read-only view of the object store (`.git/objects`)
///
/// Loose objects are read first; anything else is looked up in the packs.
#[derive(Debug, new)]
pub struct Database {
    path: Box<Path>,
    #[new(default)]
    packs: Packs,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn pack_path(&self) -> PathBuf {
        self.path.join("pack")
    }

    /// Load and decompress an object, header included
    ///
    /// Packed objects get the same `<type> <size>\0` header a loose object has.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            let packed = self
                .packs
                .read(&self.pack_path(), object_id)
                .with_context(|| format!("Unable to read packed object {object_id}"))?;

            if let Some((object_type, content)) = packed {
                let mut object = format!("{object_type} {}\0", content.len()).into_bytes();
                object.extend(content);
                return Ok(object.into());
            }
        }

        self.read_object(object_path)
    }

    /// Parse an object as `T`
    ///
    /// Returns `Ok(None)` when the object exists but has another type, and an
    /// error when it is missing or unreadable.
    pub fn parse_object_as<T: Object>(&self, object_id: &ObjectId) -> anyhow::Result<Option<T>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        if object_type == T::object_type() {
            let object = T::deserialize(object_reader)
                .with_context(|| format!("Unable to parse {object_type} {object_id}"))?;
            Ok(Some(object))
        } else {
            Ok(None)
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        self.parse_object_as(object_id)
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        self.parse_object_as(object_id)
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        self.parse_object_as(object_id)
    }

    pub fn parse_object_as_tag(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tag>> {
        self.parse_object_as(object_id)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, Cursor<Bytes>)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .with_context(|| format!("Invalid object header in {object_id}"))?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        // read the object file
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        // decompress the object content
        Self::decompress(object_content.into())
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }
}
