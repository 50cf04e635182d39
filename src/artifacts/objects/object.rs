use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use std::io::BufRead;

pub trait Unpackable {
    /// Build the object from its body; the `<type> <size>\0` header has already been consumed
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Unpackable {
    fn object_type() -> ObjectType
    where
        Self: Sized;
}
