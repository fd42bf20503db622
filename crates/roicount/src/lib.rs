//! Roicount - Sort cell markers into brain-region polygons and count them.
//!
//! Each annotated brain section holds marker coordinates and named region
//! outlines. Regions overlap because their names come from a hierarchical
//! structure ontology (a nucleus drawn inside the cortex outline, say), so a
//! marker may fall in several of them. Counting runs in two stages:
//!
//! - [`classify`] tests every marker against every outline, producing a
//!   [`MembershipMatrix`].
//! - [`resolve`] checks the matrix and assigns every ambiguous marker to the
//!   deepest of its regions, using the [`Ontology`](ontology::Ontology).
//!
//! The resolved matrix reduces to [`RegionCounts`], which merge across
//! sections and group into a [`DivisionSummary`](summary::DivisionSummary).

pub mod batch;
pub mod config;
pub mod summary;

mod classify;
mod counts;
mod error;
mod matrix;
mod resolve;

pub use roicount_core::{color, geometry, ontology, section};

pub use classify::classify;
pub use counts::{RegionCounts, count_section};
pub use error::{ResolveError, RoiCountError};
pub use matrix::{MatrixError, MembershipMatrix};
pub use resolve::resolve;

use std::{fs, path::Path};

use log::{debug, info};

use ontology::{Ontology, StructureTree};
use section::Section;

use batch::BatchReport;
use config::AppConfig;
use summary::DivisionSummary;

/// Reads a structure ontology from a JSON file.
///
/// # Errors
///
/// Returns [`RoiCountError::Read`] if the file cannot be read and
/// [`RoiCountError::Ontology`] if it is not a valid ontology.
pub fn load_ontology(path: impl AsRef<Path>) -> Result<StructureTree, RoiCountError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading ontology");

    let source = fs::read_to_string(path).map_err(|source| RoiCountError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = StructureTree::from_json(&source)?;

    debug!(structures = tree.len(); "Ontology loaded");
    Ok(tree)
}

/// Builder for counting markers per region against one ontology.
///
/// This bundles the configuration and the ontology reference so that the
/// stages of a count can be run one at a time or all together.
///
/// # Examples
///
/// ```
/// use roicount::{
///     SectionCounter,
///     config::AppConfig,
///     ontology::{StructureRecord, StructureTree},
///     section::Section,
/// };
///
/// let ontology = StructureTree::from_records([
///     StructureRecord::new(1, "root", "Root", None),
///     StructureRecord::new(2, "CTX", "Cerebral cortex", Some(1)),
///     StructureRecord::new(3, "ACB", "Nucleus accumbens", Some(2)),
/// ])
/// .expect("Invalid ontology");
///
/// let section = Section::from_json(
///     r#"{
///         "markers": [[10, 10], [50, 50], [90, 90]],
///         "regions": [
///             {"name": "CTX", "vertices": [[0, 0], [100, 0], [100, 100], [0, 100]]},
///             {"name": "ACB", "vertices": [[40, 40], [60, 40], [60, 60], [40, 60]]}
///         ]
///     }"#,
/// )
/// .expect("Invalid section");
///
/// let counter = SectionCounter::new(&ontology, AppConfig::default());
/// let counts = counter.count(&section, "slice-01").expect("Failed to count");
///
/// assert_eq!(counts.get("CTX"), 2);
/// assert_eq!(counts.get("ACB"), 1);
/// ```
pub struct SectionCounter<'o, O> {
    ontology: &'o O,
    config: AppConfig,
}

impl<'o, O: Ontology> SectionCounter<'o, O> {
    /// Create a new counter over `ontology` with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `ontology` - Structure ontology the region names are looked up in
    /// * `config` - Batch and summary settings
    pub fn new(ontology: &'o O, config: AppConfig) -> Self {
        Self { ontology, config }
    }

    /// Returns the configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Classify and resolve a section, returning the single-assignment matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a marker cannot be assigned to exactly one
    /// region.
    pub fn assign(&self, section: &Section, source_id: &str) -> Result<MembershipMatrix, ResolveError> {
        let matrix = classify(section.markers(), section.regions());
        resolve(&matrix, self.ontology, source_id)
    }

    /// Count the markers of a section per region.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a marker cannot be assigned to exactly one
    /// region.
    pub fn count(&self, section: &Section, source_id: &str) -> Result<RegionCounts, ResolveError> {
        count_section(section, self.ontology, source_id)
    }

    /// Group counts into the configured divisions.
    pub fn summarize(&self, counts: &RegionCounts) -> DivisionSummary {
        DivisionSummary::build(counts, self.ontology, self.config.summary().divisions())
    }

    /// Count every section file of `dir` in parallel and merge the results.
    ///
    /// # Errors
    ///
    /// Returns `RoiCountError` if the directory holds no section file or
    /// cannot be listed, or, with fail-fast enabled, if any section fails.
    /// See [`batch::run`].
    pub fn run_batch(&self, dir: impl AsRef<Path>) -> Result<BatchReport, RoiCountError> {
        batch::run(dir.as_ref(), self.ontology, self.config.batch())
    }
}
