//! Revision resolution
//!
//! Turns a free-form identifier (taken from the request host) into a commit
//! reference. Lookups are attempted by an ordered chain of strategies, first
//! match wins:
//!
//! 1. branch (`refs/heads/<identifier>`)
//! 2. tag (`refs/tags/<identifier>`, annotated tags dereferenced to their commit)
//! 3. literal commit hash, accepted without validation
//!
//! - `error`: resolution failures
//! - `resolved_revision`: the opaque result of a resolution
//! - `resolver`: the strategy chain
//! - `strategy`: individual strategies

pub mod error;
pub mod resolved_revision;
pub mod resolver;
pub mod strategy;
