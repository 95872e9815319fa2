//! Pack container parsing and extraction.
//!
//! A pack file stores a directory of named entries followed by the raw
//! bytes of each entry. The directory is split into blocks chained by
//! absolute offsets, so a packing tool can append a block without
//! rewriting the ones before it.
//!
//! ## Architecture
//!
//! - [`cursor`]: big-endian sequential reader with bounds-checked reads
//! - [`parser`]: walks the block chain into a [`Manifest`]
//! - [`file`]: path filtering plus read-and-parse for one file on disk
//! - [`extractor`]: copies entry byte ranges out to the filesystem
//!
//! Parsing works on a buffer read whole into memory and has no shared
//! state, so independent pack files can be processed in parallel.

pub mod cursor;
mod error;
mod extractor;
mod file;
pub mod parser;
mod structures;

#[cfg(test)]
pub(crate) mod test_support;

pub use cursor::ByteCursor;
pub use error::{FormatError, PackError, PackResult};
pub use extractor::{ExtractOptions, ExtractStats, PackExtractor};
pub use file::PackFile;
pub use parser::PackParser;
pub use structures::*;
