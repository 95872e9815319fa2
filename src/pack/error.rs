//! Error types for pack file parsing and extraction.

use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

/// Result type for path-level pack operations
pub type PackResult<T> = Result<T, PackError>;

/// Structural failures found while walking a pack directory.
///
/// These carry no path; [`PackError::Corrupt`] attaches the source file
/// once the failure reaches the per-file boundary.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A read would run past the end of the buffer
    #[error("read of {needed} bytes at offset {position} exceeds buffer of {available} bytes")]
    OutOfBounds {
        position: u64,
        needed: u64,
        available: u64,
    },

    /// An entry name is not valid UTF-8
    #[error("entry name at offset {position} is not valid UTF-8: {source}")]
    InvalidEncoding {
        position: u64,
        #[source]
        source: Utf8Error,
    },

    /// A block header points back at a block that was already parsed
    #[error("directory chain loops back to block at offset {offset}")]
    ChainCycle { offset: u32 },

    /// An entry's data range lies outside the pack file
    #[error("entry {name} spans {offset}+{size} past end of file ({file_len} bytes)")]
    EntryOutOfRange {
        name: String,
        offset: u32,
        size: u32,
        file_len: u64,
    },
}

/// Failures surfaced for a single pack file.
#[derive(Debug, Error)]
pub enum PackError {
    /// Path lacks the `.pack` extension or is a directory
    #[error("not a pack file: {}", path.display())]
    NotAPackFile { path: PathBuf },

    /// The directory structure could not be parsed
    #[error("corrupt pack file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// I/O error reading the pack or writing an entry
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry name would resolve outside the output directory
    #[error("unsafe entry name {name:?} in {}", path.display())]
    UnsafeEntryName { path: PathBuf, name: String },

    /// Fewer bytes were available than the entry declares
    #[error("short read for {name} in {}: expected {expected} bytes, got {actual}", path.display())]
    ShortRead {
        path: PathBuf,
        name: String,
        expected: u64,
        actual: u64,
    },
}

impl PackError {
    /// Whether this is the no-op skip for inputs that are not pack files
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::NotAPackFile { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
