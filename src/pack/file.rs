//! Path-level entry point: filter, read and parse one pack file.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::error::{PackError, PackResult};
use super::parser::PackParser;
use super::structures::{Manifest, has_pack_extension};

/// A pack file whose directory has been parsed
#[derive(Debug, Clone)]
pub struct PackFile {
    path: PathBuf,
    len: u64,
    manifest: Manifest,
}

impl PackFile {
    /// Read and parse the pack file at `path`.
    ///
    /// Paths without the pack extension and directories are rejected with
    /// [`PackError::NotAPackFile`] before any content is read. The buffer is
    /// parsed on the blocking pool and dropped once the manifest is built.
    pub async fn open(path: &Path, parser: PackParser) -> PackResult<Self> {
        if !has_pack_extension(path) {
            return Err(PackError::NotAPackFile {
                path: path.to_path_buf(),
            });
        }
        let meta = fs::metadata(path)
            .await
            .map_err(|e| PackError::io(path, e))?;
        if meta.is_dir() {
            return Err(PackError::NotAPackFile {
                path: path.to_path_buf(),
            });
        }

        let data = fs::read(path).await.map_err(|e| PackError::io(path, e))?;
        let len = data.len() as u64;
        let manifest = tokio::task::spawn_blocking(move || parser.parse(&data))
            .await
            .map_err(|e| PackError::io(path, std::io::Error::other(e)))?
            .map_err(|source| PackError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            len,
            manifest,
        })
    }

    /// Parse a pack already held in memory, tagging failures with `path`
    pub fn from_bytes(path: &Path, data: &[u8], parser: PackParser) -> PackResult<Self> {
        let manifest = parser.parse(data).map_err(|source| PackError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            len: data.len() as u64,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the pack file in bytes when it was parsed
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }
}
