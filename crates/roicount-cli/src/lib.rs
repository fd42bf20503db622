//! CLI logic for the Roicount marker counter.
//!
//! This module contains the core CLI logic: it counts every section file of a
//! directory and writes the division summary as TSV.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use roicount::{RoiCountError, SectionCounter, load_ontology};

/// Run the Roicount CLI application
///
/// This function counts the section files of the input directory against
/// the ontology and writes the division summary to the output file.
/// Sections that cannot be counted are reported as warnings and skipped,
/// unless fail-fast is enabled.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `RoiCountError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Ontology loading errors
/// - An input directory without section files
/// - The first failing section, with fail-fast enabled
pub fn run(args: &Args) -> Result<(), RoiCountError> {
    info!(
        input_path = args.input,
        ontology_path = args.ontology,
        output_path = args.output;
        "Counting sections"
    );

    let app_config = config::load_config(args.config.as_ref())?.with_fail_fast(args.fail_fast);

    let ontology = load_ontology(&args.ontology)?;

    let counter = SectionCounter::new(&ontology, app_config);
    let report = counter.run_batch(&args.input)?;

    for failure in report.failures() {
        warn!(
            path = failure.path().display().to_string();
            "Section skipped\n{}",
            error_adapter::render(failure.error())
        );
    }

    let summary = counter.summarize(report.counts());
    fs::write(&args.output, summary.to_tsv())?;

    info!(
        output_file = args.output,
        sections = report.processed().len(),
        skipped = report.failures().len(),
        markers = summary.total();
        "Summary exported successfully"
    );

    Ok(())
}
