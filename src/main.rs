//! Main entry point for the runpack CLI application.
//!
//! Finds pack files among the inputs, then lists or extracts each of them
//! on a pool of workers.

use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use runpack::batch::{self, collect_inputs};
use runpack::{
    BatchMode, BatchOptions, BatchReport, Cli, ExtractOptions, FileResult, Manifest, PackOutcome,
    PackParser,
};

/// Application entry point.
///
/// Exits with an error when any pack file failed, after all others have
/// been processed.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let inputs = cli.inputs();
    let files = collect_inputs(&inputs)?;
    if files.is_empty() {
        let names: Vec<_> = inputs.iter().map(|p| p.display().to_string()).collect();
        bail!("no input files found in {}", names.join(", "));
    }

    let mode = if cli.list || cli.verbose {
        BatchMode::List
    } else {
        BatchMode::Extract(ExtractOptions {
            output_dir: cli.extract_dir.clone(),
            asset_dir: (!cli.no_assets).then(|| cli.asset_dir.clone()),
            overwrite: cli.should_overwrite(),
        })
    };
    let listing = matches!(mode, BatchMode::List);
    let options = BatchOptions {
        jobs: cli.jobs(),
        parser: PackParser::new().strict_bounds(cli.strict),
        mode,
    };

    let results = batch::run_batch(files, options).await;
    if listing {
        print_listings(&results, cli.verbose);
    }

    let report = BatchReport::from_results(&results);
    info!(
        "{} pack files, {} entries, {} written, {} skipped, {} failed",
        report.processed,
        report.entries,
        format_size(report.bytes),
        report.skipped,
        report.failed
    );

    if report.failed > 0 {
        bail!("{} pack file(s) could not be unpacked", report.failed);
    }
    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` takes precedence over `-q`/`-v`.
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print manifests of successfully parsed pack files, in input order.
fn print_listings(results: &[FileResult], verbose: bool) {
    for result in results {
        if let Ok(PackOutcome::Listed(manifest)) = &result.outcome {
            if verbose {
                println!("Pack: {}", result.path.display());
            }
            list_manifest(manifest, verbose);
        }
    }
}

/// List entries of one manifest.
///
/// - Simple format: just entry names, one per line
/// - Verbose format: table with offset, size and auxiliary field
fn list_manifest(manifest: &Manifest, verbose: bool) {
    if !verbose {
        for entry in manifest {
            println!("{}", entry.name);
        }
        return;
    }

    println!("{:>10}  {:>10}  {:>10}  Name", "Offset", "Size", "Aux");
    println!("{}", "-".repeat(60));
    for entry in manifest {
        println!(
            "{:>10}  {:>10}  {:>10}  {}",
            entry.offset, entry.size, entry.aux, entry.name
        );
    }
    println!("{}", "-".repeat(60));
    println!(
        "{:>10}  {:>10}  {:>10}  {} files\n",
        "",
        manifest.total_size(),
        "",
        manifest.len()
    );
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
