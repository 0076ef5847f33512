// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::HashAlgorithm;

/// Command-line arguments for `janitor`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "janitor",
    version,
    about = "Light and fast project housekeeping: detects changed files and \
             runs tagging, header prefixing and version bumping on them.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Janitor.toml` in the working path; a missing default file
    /// falls back to the builtin configuration.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<String>,

    /// Working path to scan. Defaults to the current directory.
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<String>,

    /// Ignore any config file and use the builtin default configuration.
    #[arg(long, short = 'd')]
    pub default: bool,

    /// Write a sample config file to the working path and exit.
    #[arg(long, short = 'g')]
    pub generate: bool,

    /// Drop the fingerprint cache first, so every file counts as changed.
    #[arg(long, short = 'r')]
    pub rebuild: bool,

    /// Update the fingerprint cache without dispatching to modules.
    ///
    /// In a repeating watch session this only suppresses the first pass.
    #[arg(long, short = 'u')]
    pub update: bool,

    /// Keep re-scanning at this interval (in seconds) until interrupted.
    ///
    /// Without this flag janitor performs a single pass and exits.
    #[arg(long, short = 'w', value_name = "SECONDS")]
    pub watch: Option<f64>,

    /// Digest algorithm for file fingerprints.
    ///
    /// Changing the algorithm invalidates an existing cache as a whole.
    #[arg(long, short = 'a', value_enum, default_value = "blake3")]
    pub algorithm: AlgorithmArg,

    /// Skip a module for this run (repeatable).
    #[arg(long, short = 'e', value_name = "MODULE")]
    pub exclude: Vec<String>,

    /// Bump a version sequence directly and exit, without scanning.
    #[arg(long, short = 'i', value_enum, value_name = "SEQ")]
    pub increase: Option<SequenceArg>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `JANITOR_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Hash algorithm as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Md5,
    Sha256,
    Blake3,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Md5 => HashAlgorithm::Md5,
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
            AlgorithmArg::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

/// Version sequence as exposed on the CLI (`--increase`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SequenceArg {
    Major,
    Minor,
    Maintenance,
    Build,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
