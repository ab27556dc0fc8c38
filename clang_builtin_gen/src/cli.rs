//! Command-line interface definitions for clang-builtin-gen.

use clap::Parser;
use std::path::PathBuf;

/// Generates inline wrappers for clang's complex-number library builtins
#[derive(Parser, Debug)]
#[command(name = "clang-builtin-gen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to clang's Builtins.def
    pub input: Option<PathBuf>,

    /// Installation root the headers are written under
    #[arg(long, env = "CHPL_HOME")]
    pub chpl_home: Option<PathBuf>,

    /// TOML file overriding the curated builtin lists and wrapper prefix
    #[arg(short, long, env = "CLANG_BUILTIN_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip running the license script on the generated headers
    #[arg(long)]
    pub no_license: bool,

    /// Enable verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
