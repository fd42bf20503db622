//! Annotation records for one brain section.
//!
//! A [`Section`] is what the annotation tool saves for one image: the
//! markers placed on detected cells, the named regions drawn around brain
//! structures, and some descriptive metadata that the counting pipeline
//! carries along but never reads.
//!
//! Sections are read from JSON:
//!
//! ```json
//! {
//!   "markers": [[12, 40], [18, 22]],
//!   "regions": [
//!     {"name": "CTX", "vertices": [[0, 0], [100, 0], [100, 100], [0, 100]]}
//!   ],
//!   "metadata": {"name": "20-0224", "image_size": [2048, 1536]}
//! }
//! ```
//!
//! Unknown fields are rejected rather than absorbed, so a misspelt key is
//! reported instead of silently ignored.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{Point, Polygon};

/// A marker placed on a detected cell, in image-pixel coordinates.
///
/// Within a section, markers are identified by their position in
/// [`Section::markers`].
pub type Marker = Point;

/// Errors raised while building or reading a [`Section`]
#[derive(Debug, Error)]
pub enum SectionError {
    #[error("invalid section record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("region {index} has an empty name")]
    EmptyRegionName { index: usize },

    #[error("region name `{0}` is used more than once")]
    DuplicateRegion(String),

    #[error("marker {index} has a non-finite coordinate")]
    NonFiniteMarker { index: usize },
}

/// A named region of interest.
///
/// The name is the ontology acronym of the brain structure the region
/// outlines (for example `CTX` or `ACB`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Region {
    name: String,
    vertices: Polygon,
}

impl Region {
    /// Creates a new region from a name and its outline.
    pub fn new(name: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            name: name.into(),
            vertices: polygon,
        }
    }

    /// Returns the region name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the region outline
    pub fn polygon(&self) -> &Polygon {
        &self.vertices
    }
}

/// Descriptive fields stored alongside a section.
///
/// None of these take part in counting.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionMetadata {
    /// Image or section name
    #[serde(default)]
    pub name: Option<String>,

    /// Image width and height in pixels
    #[serde(default)]
    pub image_size: Option<[u32; 2]>,

    /// Pixel size, in the unit used by the acquisition software
    #[serde(default)]
    pub resolution: Option<f64>,

    /// Atlas plate the section was matched to
    #[serde(default)]
    pub atlas_ref: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionRecord {
    markers: Vec<Marker>,
    regions: Vec<Region>,
    #[serde(default)]
    metadata: SectionMetadata,
}

/// One annotated brain section: markers, regions and metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SectionRecord")]
pub struct Section {
    markers: Vec<Marker>,
    regions: Vec<Region>,
    metadata: SectionMetadata,
}

impl Section {
    /// Creates a section after checking its contents.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] if a marker has a non-finite coordinate, or
    /// if a region name is empty or repeated.
    pub fn new(
        markers: Vec<Marker>,
        regions: Vec<Region>,
        metadata: SectionMetadata,
    ) -> Result<Self, SectionError> {
        if let Some(index) = markers.iter().position(|m| !m.is_finite()) {
            return Err(SectionError::NonFiniteMarker { index });
        }

        let mut seen = HashSet::with_capacity(regions.len());
        for (index, region) in regions.iter().enumerate() {
            if region.name.trim().is_empty() {
                return Err(SectionError::EmptyRegionName { index });
            }
            if !seen.insert(region.name.as_str()) {
                return Err(SectionError::DuplicateRegion(region.name.clone()));
            }
        }

        Ok(Self {
            markers,
            regions,
            metadata,
        })
    }

    /// Parses and validates a section from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::Json`] for malformed JSON, missing or unknown
    /// fields, and for any of the checks done by [`Section::new`].
    pub fn from_json(source: &str) -> Result<Self, SectionError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Returns the markers, indexed by position
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the regions in file order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Returns the section metadata
    pub fn metadata(&self) -> &SectionMetadata {
        &self.metadata
    }
}

impl TryFrom<SectionRecord> for Section {
    type Error = SectionError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        Self::new(record.markers, record.regions, record.metadata)
    }
}
