//! Command-line argument definitions for the Roicount CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the ontology file,
//! configuration file selection, failure handling, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Roicount marker counter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of section files
    #[arg(help = "Directory holding the section files to count")]
    pub input: String,

    /// Path to the structure ontology (JSON)
    #[arg(long)]
    pub ontology: String,

    /// Path to the output TSV file
    #[arg(short, long, default_value = "counts.tsv")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Abort on the first section that cannot be counted
    #[arg(long)]
    pub fail_fast: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
