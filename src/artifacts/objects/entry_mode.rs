//! Tree entry modes
//!
//! Git records a mode next to every tree entry. Only a handful of values are
//! ever written by git itself:
//!
//! - `100644` / `100755`: regular and executable files
//! - `100664`: group-writable file, written by very old git versions
//! - `120000`: symbolic link (the blob holds the link target)
//! - `40000`: subdirectory (nested tree)
//! - `160000`: gitlink, i.e. a submodule commit

#[derive(Debug, Clone, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Symlink,
}

#[derive(Debug, Clone, Eq, Ord, Default, PartialEq, PartialOrd)]
pub enum EntryMode {
    File(FileMode),
    #[default]
    Directory,
    Submodule,
}

impl EntryMode {
    /// Parse the octal mode as written in a tree object
    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| anyhow::anyhow!("invalid entry mode: {mode}"))?;

        EntryMode::try_from(mode)
    }

    /// Whether the entry points at a tree object
    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    /// Whether the entry points at a blob object
    pub fn is_blob(&self) -> bool {
        matches!(self, EntryMode::File(_))
    }
}

impl TryFrom<u32> for EntryMode {
    type Error = anyhow::Error;

    fn try_from(mode: u32) -> anyhow::Result<Self> {
        match mode {
            0o100644 | 0o100664 => Ok(EntryMode::File(FileMode::Regular)),
            0o100755 => Ok(EntryMode::File(FileMode::Executable)),
            0o120000 => Ok(EntryMode::File(FileMode::Symlink)),
            0o40000 => Ok(EntryMode::Directory),
            0o160000 => Ok(EntryMode::Submodule),
            _ => Err(anyhow::anyhow!("invalid entry mode: {mode:o}")),
        }
    }
}
