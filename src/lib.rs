//! # runpack
//!
//! Extract the files bundled inside `.pack` containers.
//!
//! A pack file holds a directory of named entries (name, offset, size and
//! an opaque auxiliary field) followed by each entry's raw bytes. The
//! directory may be split across several blocks linked by absolute
//! offsets; [`PackParser`] follows that chain into a [`Manifest`].
//!
//! ## Features
//!
//! - Bounds-checked parsing of chained directory blocks, with cycle detection
//! - Optional eager validation of entry data ranges
//! - Extraction to an output tree plus per-extension asset copies
//! - Parallel processing of many pack files with per-file failure isolation
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use runpack::{ExtractOptions, LocalFileReader, PackExtractor, PackFile, PackParser};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let path = Path::new("input/data.pack");
//!     let pack = PackFile::open(path, PackParser::new()).await?;
//!     for entry in pack.manifest() {
//!         println!("{} ({} bytes)", entry.name, entry.size);
//!     }
//!
//!     let reader = Arc::new(LocalFileReader::new(path)?);
//!     let extractor = PackExtractor::new(reader, pack.into_manifest(), path);
//!     extractor.extract_all(&ExtractOptions::default()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cli;
pub mod io;
pub mod pack;

pub use batch::{BatchMode, BatchOptions, BatchReport, FileResult, PackOutcome};
pub use cli::Cli;
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use pack::{
    ExtractOptions, FormatError, Manifest, PackEntry, PackError, PackExtractor, PackFile,
    PackParser,
};
