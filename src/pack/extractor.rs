use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::io::ReadAt;

use super::error::{PackError, PackResult};
use super::structures::{Manifest, PackEntry};

/// Where and how extracted entries are written
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Root that entry names are resolved against
    pub output_dir: PathBuf,
    /// Root for copies grouped by extension; `None` disables the copies
    pub asset_dir: Option<PathBuf>,
    /// Replace files that already exist
    pub overwrite: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            asset_dir: Some(PathBuf::from("assets")),
            overwrite: true,
        }
    }
}

/// Totals for one pack file's extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub written: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Pack file extractor
pub struct PackExtractor<R: ReadAt> {
    reader: Arc<R>,
    manifest: Manifest,
    source: PathBuf,
}

impl<R: ReadAt> PackExtractor<R> {
    /// `source` is only used to label errors.
    pub fn new(reader: Arc<R>, manifest: Manifest, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            manifest,
            source: source.into(),
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Read exactly `entry.size` bytes at `entry.offset`
    pub async fn extract_to_memory(&self, entry: &PackEntry) -> PackResult<Vec<u8>> {
        // Check the declared size against the source before allocating for it
        let source_len = self.reader.size();
        if entry.end() > source_len {
            return Err(PackError::ShortRead {
                path: self.source.clone(),
                name: entry.name.clone(),
                expected: u64::from(entry.size),
                actual: source_len.saturating_sub(u64::from(entry.offset)),
            });
        }

        let mut buf = vec![0u8; entry.size as usize];
        let read = self
            .reader
            .read_at(u64::from(entry.offset), &mut buf)
            .await
            .map_err(|e| PackError::io(&self.source, std::io::Error::other(e)))?;

        if read < buf.len() {
            return Err(PackError::ShortRead {
                path: self.source.clone(),
                name: entry.name.clone(),
                expected: u64::from(entry.size),
                actual: read as u64,
            });
        }
        Ok(buf)
    }

    /// Extract an entry to an explicit path
    pub async fn extract_to_file(&self, entry: &PackEntry, output_path: &Path) -> PackResult<()> {
        let data = self.extract_to_memory(entry).await?;
        write_file(output_path, &data).await
    }

    /// Extract every entry in manifest order.
    ///
    /// Each entry lands at `output_dir/<name>`, with a copy at
    /// `asset_dir/<extension>/<name>` (or `asset_dir/<name>` for names
    /// without an extension). Names are all checked before anything is
    /// written; after that, the first failure stops this pack.
    pub async fn extract_all(&self, options: &ExtractOptions) -> PackResult<ExtractStats> {
        let mut stats = ExtractStats::default();

        let targets = self
            .manifest
            .iter()
            .map(|entry| {
                entry
                    .relative_path()
                    .map(|relative| (entry, relative))
                    .ok_or_else(|| PackError::UnsafeEntryName {
                        path: self.source.clone(),
                        name: entry.name.clone(),
                    })
            })
            .collect::<PackResult<Vec<_>>>()?;

        for (entry, relative) in targets {
            let output_path = options.output_dir.join(&relative);

            if !options.overwrite
                && fs::try_exists(&output_path)
                    .await
                    .map_err(|e| PackError::io(&output_path, e))?
            {
                debug!(name = %entry.name, "skipping existing file");
                stats.skipped += 1;
                continue;
            }

            let data = self.extract_to_memory(entry).await?;
            write_file(&output_path, &data).await?;
            info!(name = %entry.name, size = entry.size, "unpacked");

            if let Some(asset_dir) = &options.asset_dir {
                let asset_path = match entry.extension() {
                    Some(ext) => asset_dir.join(ext).join(&relative),
                    None => asset_dir.join(&relative),
                };
                write_file(&asset_path, &data).await?;
            }

            stats.written += 1;
            stats.bytes += data.len() as u64;
        }

        Ok(stats)
    }
}

async fn write_file(path: &Path, data: &[u8]) -> PackResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PackError::io(parent, e))?;
        }
    }

    let mut file = fs::File::create(path)
        .await
        .map_err(|e| PackError::io(path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| PackError::io(path, e))?;
    file.flush().await.map_err(|e| PackError::io(path, e))?;

    Ok(())
}
