#![allow(dead_code)]

pub mod command;
pub mod file;

pub const README_V1: &str = "# revserve fixture\n\nversion one\n";
pub const README_V2: &str = "# revserve fixture\n\nversion two\n";
pub const APP_JS: &str = "console.log('hello');\n";
pub const SPACED: &str = "a file with a space in its name\n";
pub const NOT_UTF8: &[u8] = &[0xff, 0xfe, 0x00, 0x80];
