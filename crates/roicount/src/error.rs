//! Error types for Roicount operations.
//!
//! This module provides [`ResolveError`], raised when the markers of one
//! section cannot be assigned to exactly one region each, and the top-level
//! [`RoiCountError`] which also covers reading files and loading the ontology.

use std::{io, path::PathBuf};

use thiserror::Error;

use roicount_core::{ontology::OntologyError, section::SectionError};

/// Reasons a section's membership matrix cannot be resolved.
///
/// Every variant names the section it came from and the offending markers or
/// regions. All of them are fatal for that section; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Some markers lie outside every region.
    #[error("{source_id}: marker(s) {markers:?} are not inside any region")]
    UnassignedMarker {
        source_id: String,
        markers: Vec<usize>,
    },

    /// Region names that the ontology does not know.
    #[error("{source_id}: unknown acronym(s) {}", acronyms.join(", "))]
    UnknownAcronym {
        source_id: String,
        acronyms: Vec<String>,
    },

    /// A marker lies in more than two regions.
    #[error(
        "{source_id}: marker {marker} lies in {} regions ({}), at most two can be resolved",
        regions.len(),
        regions.join(", ")
    )]
    TooManyRegions {
        source_id: String,
        marker: usize,
        regions: Vec<String>,
    },

    /// A marker lies in two regions, neither of which contains the other.
    #[error("{source_id}: marker {marker} lies in `{shallow}` and `{deep}`, but `{deep}` is not part of `{shallow}`")]
    DisjointRegions {
        source_id: String,
        marker: usize,
        shallow: String,
        deep: String,
    },

    /// A marker is not in exactly one region after resolution.
    #[error("{source_id}: marker {marker} is assigned to {sum} regions after resolution")]
    InvariantViolation {
        source_id: String,
        marker: usize,
        sum: usize,
    },
}

impl ResolveError {
    /// Returns the identifier of the section that failed
    pub fn source_id(&self) -> &str {
        match self {
            Self::UnassignedMarker { source_id, .. }
            | Self::UnknownAcronym { source_id, .. }
            | Self::TooManyRegions { source_id, .. }
            | Self::DisjointRegions { source_id, .. }
            | Self::InvariantViolation { source_id, .. } => source_id,
        }
    }

    /// Returns true if the error points at a bug rather than at bad input
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

/// The main error type for Roicount operations.
#[derive(Debug, Error)]
pub enum RoiCountError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid section file `{}`: {source}", path.display())]
    Section { path: PathBuf, source: SectionError },

    #[error("invalid ontology: {0}")]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("no `.{extension}` section files found in `{}`", dir.display())]
    NoSections { dir: PathBuf, extension: String },
}
