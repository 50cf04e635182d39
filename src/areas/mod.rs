//! Core repository components
//!
//! This module contains the read side of a Git repository:
//!
//! - `database`: Object database holding blobs, trees, commits and tags
//! - `pack`: Objects stored in packfiles, with their deltas resolved
//! - `refs`: Reference lookup (branches, tags, packed refs)
//! - `repository`: Opening a repository and sharing it across requests

pub mod database;
pub mod pack;
pub mod refs;
pub mod repository;
