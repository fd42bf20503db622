//! Per-region marker counts.

use indexmap::IndexMap;
use log::debug;

use roicount_core::{ontology::Ontology, section::Section};

use crate::{MembershipMatrix, ResolveError, classify, resolve};

/// Classifies, resolves and counts the markers of one section.
///
/// # Errors
///
/// Returns [`ResolveError`] if a marker cannot be assigned to exactly one
/// region; see [`resolve`].
pub fn count_section<O: Ontology>(
    section: &Section,
    ontology: &O,
    source_id: &str,
) -> Result<RegionCounts, ResolveError> {
    let matrix = classify(section.markers(), section.regions());
    let resolved = resolve(&matrix, ontology, source_id)?;
    let counts = resolved.counts();
    debug!(
        source_id,
        markers = section.markers().len(),
        regions = counts.len();
        "Section counted"
    );
    Ok(counts)
}

/// Number of markers per region, in first-seen order.
///
/// Regions missing from a `RegionCounts` count as zero, which is what makes
/// counts from different sections mergeable.
///
/// # Examples
///
/// ```
/// use roicount::RegionCounts;
///
/// let mut total: RegionCounts = [("CTX", 2), ("ACB", 1)].into_iter().collect();
/// let other: RegionCounts = [("ACB", 3), ("TH", 4)].into_iter().collect();
///
/// total.merge(&other);
/// assert_eq!(total.get("CTX"), 2);
/// assert_eq!(total.get("ACB"), 4);
/// assert_eq!(total.get("TH"), 4);
/// assert_eq!(total.get("HY"), 0);
/// assert_eq!(total.total(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionCounts {
    counts: IndexMap<String, usize>,
}

impl RegionCounts {
    /// Creates empty counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums each column of a resolved matrix
    pub fn from_matrix(matrix: &MembershipMatrix) -> Self {
        matrix
            .column_names()
            .map(|name| (name, matrix.column_sum(name).unwrap_or(0)))
            .collect()
    }

    /// Returns the count for `region`, zero if absent
    pub fn get(&self, region: &str) -> usize {
        self.counts.get(region).copied().unwrap_or(0)
    }

    /// Adds `count` markers to `region`
    pub fn add(&mut self, region: &str, count: usize) {
        match self.counts.get_mut(region) {
            Some(existing) => *existing += count,
            None => {
                self.counts.insert(region.to_string(), count);
            }
        }
    }

    /// Adds every count of `other` into this one, aligning on region name
    pub fn merge(&mut self, other: &RegionCounts) {
        for (region, count) in other.iter() {
            self.add(region, count);
        }
    }

    /// Iterates over (region, count) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, &count)| (name.as_str(), count))
    }

    /// Returns the number of regions
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no region has been counted
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the number of markers over all regions
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl<S: AsRef<str>> FromIterator<(S, usize)> for RegionCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (region, count) in iter {
            counts.add(region.as_ref(), count);
        }
        counts
    }
}

impl MembershipMatrix {
    /// Reduces the matrix to per-region counts; see [`RegionCounts::from_matrix`]
    pub fn counts(&self) -> RegionCounts {
        RegionCounts::from_matrix(self)
    }
}
