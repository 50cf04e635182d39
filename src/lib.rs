//! Serve files and directory listings out of a git repository, with the
//! revision (branch, tag or commit) picked from the request host.
//!
//! - `areas`: the on-disk repository (object database, references)
//! - `artifacts`: git objects, revision resolution and snapshot reads
//! - `server`: the HTTP front end

pub mod areas;
pub mod artifacts;
pub mod server;
