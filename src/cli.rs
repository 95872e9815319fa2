use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "runpack")]
#[command(version)]
#[command(about = "Extract files from .pack containers", long_about = None)]
#[command(after_help = "Examples:\n  \
  runpack                        unpack every .pack file under ./input\n  \
  runpack data.pack -d out       unpack one file into ./out\n  \
  runpack -l -v input/           list entries with offsets and sizes")]
pub struct Cli {
    /// Pack files or directories to search (default: input)
    #[arg(value_name = "INPUTS")]
    pub inputs: Vec<PathBuf>,

    /// Extract files into DIR
    #[arg(short = 'd', value_name = "DIR", default_value = "output")]
    pub extract_dir: PathBuf,

    /// Copy extracted files into DIR/<extension>/
    #[arg(short = 'a', value_name = "DIR", default_value = "assets")]
    pub asset_dir: PathBuf,

    /// Do not make the per-extension copies
    #[arg(long)]
    pub no_assets: bool,

    /// List entries (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// Verbose listing and debug logging
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Number of pack files processed in parallel (default: CPU count)
    #[arg(short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Reject pack files whose entries point past end of file
    #[arg(long)]
    pub strict: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    /// Inputs to scan, falling back to `./input`
    pub fn inputs(&self) -> Vec<PathBuf> {
        if self.inputs.is_empty() {
            vec![PathBuf::from("input")]
        } else {
            self.inputs.clone()
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
            .filter(|&n| n > 0)
            .or_else(|| std::thread::available_parallelism().ok().map(usize::from))
            .unwrap_or(1)
    }

    pub fn should_overwrite(&self) -> bool {
        !self.never_overwrite
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (0, true) => "debug",
            (0, false) => "info",
            (1, _) => "warn",
            _ => "error",
        }
    }
}
