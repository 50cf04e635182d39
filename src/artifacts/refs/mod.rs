//! Reference names
//!
//! - `ref_name`: validated short names (`main`, `v1.0.0`) and full reference paths
//!   (`refs/heads/main`)

use regex::Regex;
use std::sync::LazyLock;

pub mod ref_name;

pub const INVALID_REF_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const HEADS_PREFIX: &str = "refs/heads/";
pub const TAGS_PREFIX: &str = "refs/tags/";

/// [`INVALID_REF_NAME_REGEX`] compiled once per process
pub static INVALID_REF_NAME: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(INVALID_REF_NAME_REGEX));
