//! Pack directory parser.
//!
//! The directory is a chain of blocks, each starting with the absolute
//! offset of the next block's header and a count of the entries that
//! follow. A header value of zero ends the chain:
//!
//! ```text
//! PackFile   := Block* Terminator
//! Block      := next:u32 (!= 0)  count:u32  Entry{count}
//! Entry      := name_len:u32  name:[u8; name_len]  offset:u32  size:u32  aux:u32
//! Terminator := 0u32
//! ```
//!
//! Offset 0 always holds the first block's header, so no later block can
//! live there and zero is free to act as the sentinel.

use std::collections::HashSet;

use tracing::debug;

use super::cursor::ByteCursor;
use super::error::FormatError;
use super::structures::{END_OF_CHAIN, Manifest, PackEntry};

/// Smallest possible encoded entry: empty name plus three integers
const MIN_ENTRY_SIZE: usize = 16;

/// Walks the directory chain of an in-memory pack file.
///
/// Parsing is a pure function of the input bytes; a parser holds only
/// options, so one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackParser {
    /// Validate every entry's data range against the buffer length
    strict_bounds: bool,
}

impl PackParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable eager `offset + size` validation.
    ///
    /// Without it, out-of-range entries only fail when extracted.
    pub fn strict_bounds(mut self, strict: bool) -> Self {
        self.strict_bounds = strict;
        self
    }

    /// Parse the whole directory chain into a manifest.
    ///
    /// Any failure discards the entries read so far.
    pub fn parse(&self, buf: &[u8]) -> Result<Manifest, FormatError> {
        let mut cursor = ByteCursor::new(buf);
        let mut entries = Vec::new();
        let mut visited = HashSet::from([0u32]);
        let mut block_offset = 0u32;

        loop {
            let next = cursor.read_u32()?;
            if next == END_OF_CHAIN {
                break;
            }

            let count = cursor.read_u32()?;
            debug!(block_offset, next, count, "reading directory block");

            // The count is untrusted; don't let it drive the allocation.
            entries.reserve((count as usize).min(cursor.remaining() / MIN_ENTRY_SIZE));
            for _ in 0..count {
                entries.push(read_entry(&mut cursor)?);
            }

            if !visited.insert(next) {
                return Err(FormatError::ChainCycle { offset: next });
            }
            cursor.seek(next);
            block_offset = next;
        }

        let manifest = Manifest::from(entries);
        if self.strict_bounds {
            manifest.check_bounds(buf.len() as u64)?;
        }
        Ok(manifest)
    }
}

fn read_entry(cursor: &mut ByteCursor<'_>) -> Result<PackEntry, FormatError> {
    let name = cursor.read_string()?;
    let offset = cursor.read_u32()?;
    let size = cursor.read_u32()?;
    let aux = cursor.read_u32()?;
    Ok(PackEntry {
        name,
        offset,
        size,
        aux,
    })
}
