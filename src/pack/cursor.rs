//! Sequential big-endian reader over an in-memory pack buffer.

use byteorder::{BigEndian, ByteOrder};

use super::error::FormatError;

/// Forward-only reader with absolute repositioning.
///
/// Bounds are checked on every read, never on [`seek`](Self::seek): a jump
/// target taken from the file is untrusted until something is read there.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Current absolute position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.position)
    }

    /// Move to an absolute position. May point past the end.
    pub fn seek(&mut self, position: u32) {
        self.position = position as usize;
    }

    /// Read a big-endian `u32` and advance by 4.
    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        let bytes = self.take(4)?;
        Ok(BigEndian::read_u32(bytes))
    }

    /// Read a `u32` byte length followed by that many UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String, FormatError> {
        let len = self.read_u32()?;
        let start = self.position;
        let bytes = self.take(len as usize)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|source| FormatError::InvalidEncoding {
                position: start as u64,
                source,
            })
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < needed {
            return Err(FormatError::OutOfBounds {
                position: self.position as u64,
                needed: needed as u64,
                available: self.buf.len() as u64,
            });
        }
        let bytes = &self.buf[self.position..self.position + needed];
        self.position += needed;
        Ok(bytes)
    }
}
