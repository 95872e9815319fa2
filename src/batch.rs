//! Input discovery and parallel processing of many pack files.
//!
//! Every pack file is an independent job: it gets its own buffer, parser
//! and extractor, and its failure is logged and counted without touching
//! the others.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::io::LocalFileReader;
use crate::pack::{
    ExtractOptions, ExtractStats, Manifest, PackError, PackExtractor, PackFile, PackParser,
    PackResult,
};

/// What to do with each parsed pack file
#[derive(Debug, Clone)]
pub enum BatchMode {
    /// Return manifests without writing anything
    List,
    /// Extract every entry
    Extract(ExtractOptions),
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum pack files in flight
    pub jobs: usize,
    pub parser: PackParser,
    pub mode: BatchMode,
}

/// Result of processing one input that was a pack file
#[derive(Debug)]
pub enum PackOutcome {
    Listed(Manifest),
    Extracted { entries: usize, stats: ExtractStats },
}

/// Per-input result, in input order
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: PackResult<PackOutcome>,
}

/// Totals across a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Pack files parsed (and extracted, unless listing)
    pub processed: usize,
    /// Inputs that were not pack files
    pub skipped: usize,
    /// Pack files that failed to parse or extract
    pub failed: usize,
    /// Manifest entries seen across processed pack files
    pub entries: usize,
    /// Bytes written to the output directory
    pub bytes: u64,
}

impl BatchReport {
    pub fn from_results(results: &[FileResult]) -> Self {
        let mut report = Self::default();
        for result in results {
            match &result.outcome {
                Ok(PackOutcome::Listed(manifest)) => {
                    report.processed += 1;
                    report.entries += manifest.len();
                }
                Ok(PackOutcome::Extracted { entries, stats }) => {
                    report.processed += 1;
                    report.entries += entries;
                    report.bytes += stats.bytes;
                }
                Err(e) if e.is_skip() => report.skipped += 1,
                Err(_) => report.failed += 1,
            }
        }
        report
    }
}

/// Expand directories into the files beneath them.
///
/// Directories are walked recursively with entries sorted by name so the
/// processing order is stable. Explicit file arguments are kept as given;
/// inputs that do not exist are reported and left out.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.exists() {
            warn!("input not found: {}", input.display());
        } else if input.is_dir() {
            walk_dir(input, &mut files)?;
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Process every file with at most `options.jobs` running at once.
///
/// Must be called from within a multi-threaded or current-thread tokio
/// runtime. Results come back in the order of `files`.
pub async fn run_batch(files: Vec<PathBuf>, options: BatchOptions) -> Vec<FileResult> {
    let permits = Arc::new(Semaphore::new(options.jobs.max(1)));
    let options = Arc::new(options);
    let mut set = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let permits = permits.clone();
        let options = options.clone();
        set.spawn(async move {
            // The semaphore is never closed
            let _permit = permits.acquire_owned().await.ok();
            let outcome = process_pack(&path, &options).await;
            match &outcome {
                Err(e) if e.is_skip() => debug!("{e}"),
                Err(e) => error!("An error occurred while unpacking {}: {e}", path.display()),
                Ok(_) => {}
            }
            (index, FileResult { path, outcome })
        });
    }

    let mut results: Vec<Option<FileResult>> = files.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = Some(result),
            Err(e) => error!("pack worker panicked: {e}"),
        }
    }

    // A panicked worker leaves a hole; report it as a failure for that path
    results
        .into_iter()
        .zip(files)
        .map(|(result, path)| {
            result.unwrap_or_else(|| FileResult {
                outcome: Err(PackError::io(
                    &path,
                    std::io::Error::other("worker terminated unexpectedly"),
                )),
                path,
            })
        })
        .collect()
}

/// Parse one pack file and list or extract it
pub async fn process_pack(path: &Path, options: &BatchOptions) -> PackResult<PackOutcome> {
    let pack = PackFile::open(path, options.parser).await?;
    debug!(path = %path.display(), entries = pack.manifest().len(), "parsed pack file");

    let extract = match &options.mode {
        BatchMode::List => return Ok(PackOutcome::Listed(pack.into_manifest())),
        BatchMode::Extract(extract) => extract,
    };

    let reader =
        LocalFileReader::new(path).map_err(|e| PackError::io(path, std::io::Error::other(e)))?;
    let entries = pack.manifest().len();
    let extractor = PackExtractor::new(Arc::new(reader), pack.into_manifest(), path);
    let stats = extractor.extract_all(extract).await?;
    info!(
        path = %path.display(),
        written = stats.written,
        skipped = stats.skipped,
        "unpacked pack file"
    );

    Ok(PackOutcome::Extracted { entries, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::test_support::encode_pack;
    use tempfile::TempDir;

    fn write_pack(path: &Path, groups: &[&[(&str, &[u8])]]) {
        let (bytes, _) = encode_pack(groups);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_collect_inputs_recursive_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("input");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("b.pack"), b"").unwrap();
        std::fs::write(root.join("a.pack"), b"").unwrap();
        std::fs::write(root.join("sub").join("c.txt"), b"").unwrap();

        let extra = dir.path().join("z.pack");
        std::fs::write(&extra, b"").unwrap();
        let files = collect_inputs(&[root.clone(), extra.clone()]).unwrap();
        assert_eq!(
            files,
            vec![
                root.join("a.pack"),
                root.join("b.pack"),
                root.join("sub").join("c.txt"),
                extra,
            ]
        );
    }

    #[test]
    fn test_collect_inputs_skips_missing_paths() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("present.pack");
        std::fs::write(&present, [0u8, 0, 0, 0]).unwrap();

        let files = collect_inputs(&[dir.path().join("input"), present.clone()]).unwrap();
        assert_eq!(files, vec![present]);

        let files = collect_inputs(&[dir.path().join("missing.pack")]).unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_one_corrupt_pack_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        write_pack(&input.join("good1.pack"), &[&[("a.txt", &b"aaa"[..])]]);
        std::fs::write(input.join("bad.pack"), [0u8, 0, 0, 99, 0, 0, 0, 5]).unwrap();
        write_pack(
            &input.join("good2.pack"),
            &[&[("b.bin", &b"bb"[..])], &[("c", &b"c"[..])]],
        );
        std::fs::write(input.join("notes.txt"), b"ignore me").unwrap();

        let files = collect_inputs(&[input]).unwrap();
        let options = BatchOptions {
            jobs: 2,
            parser: PackParser::new(),
            mode: BatchMode::Extract(ExtractOptions {
                output_dir: dir.path().join("output"),
                asset_dir: Some(dir.path().join("assets")),
                overwrite: true,
            }),
        };
        let results = run_batch(files, options).await;

        let names: Vec<_> = results
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["bad.pack", "good1.pack", "good2.pack", "notes.txt"]);
        assert!(matches!(results[0].outcome, Err(PackError::Corrupt { .. })));

        let report = BatchReport::from_results(&results);
        assert_eq!(
            report,
            BatchReport {
                processed: 2,
                skipped: 1,
                failed: 1,
                entries: 3,
                bytes: 6,
            }
        );

        let out = dir.path().join("output");
        assert_eq!(std::fs::read(out.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(std::fs::read(out.join("b.bin")).unwrap(), b"bb");
        assert_eq!(std::fs::read(out.join("c")).unwrap(), b"c");
        assert!(dir.path().join("assets").join("bin").join("b.bin").exists());
    }

    #[tokio::test]
    async fn test_list_mode_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.pack");
        write_pack(&path, &[&[("x.txt", &b"x"[..]), ("y.txt", &b"yy"[..])]]);

        let options = BatchOptions {
            jobs: 1,
            parser: PackParser::new(),
            mode: BatchMode::List,
        };
        let results = run_batch(vec![path], options).await;

        match &results[0].outcome {
            Ok(PackOutcome::Listed(manifest)) => {
                let names: Vec<_> = manifest.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(names, ["x.txt", "y.txt"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!dir.path().join("output").exists());
    }
}
