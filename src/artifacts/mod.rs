//! Git data structures and algorithms
//!
//! - `database`: Database entry types
//! - `objects`: Git object types (blob, tree, commit, tag)
//! - `refs`: Reference names
//! - `revision`: Resolving a host-supplied identifier to a commit
//! - `snapshot`: Listing directories and reading files at a revision

pub mod database;
pub mod objects;
pub mod refs;
pub mod revision;
pub mod snapshot;
