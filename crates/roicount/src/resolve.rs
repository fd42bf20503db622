//! Ambiguity resolution through the structure ontology.
//!
//! Regions drawn on a section overlap whenever a finer structure is outlined
//! inside a coarser one (nucleus accumbens inside cerebral nuclei, say). A
//! marker inside both is counted once, in the deeper structure. Any other
//! overlap is an annotation error and is reported instead of guessed at.

use log::{debug, error, trace};

use roicount_core::ontology::{Ontology, StructureNode};

use crate::{MembershipMatrix, ResolveError};

/// Reduces a membership matrix to one region per marker.
///
/// Steps, in order:
///
/// 1. Every marker must lie in at least one region.
/// 2. Regions holding no marker are dropped.
/// 3. Every remaining region name must be known to the ontology.
/// 4. Each marker lying in two regions is removed from the shallower one,
///    provided that region contains the deeper one.
/// 5. Regions emptied by step 4 are dropped, and every marker is checked to
///    lie in exactly one region.
///
/// The input is left untouched; the resolved matrix is returned. Resolving an
/// already resolved matrix returns it unchanged.
///
/// # Arguments
///
/// * `matrix` - Output of [`classify`](crate::classify)
/// * `ontology` - Acronym lookup for region names
/// * `source_id` - Section identifier used in errors and logs
///
/// # Errors
///
/// Returns [`ResolveError`] for markers outside every region, unknown region
/// names, markers in more than two regions, and overlapping regions with no
/// ancestry relation. [`ResolveError::InvariantViolation`] indicates a bug.
pub fn resolve<O: Ontology>(
    matrix: &MembershipMatrix,
    ontology: &O,
    source_id: &str,
) -> Result<MembershipMatrix, ResolveError> {
    let unassigned: Vec<usize> = (0..matrix.n_rows())
        .filter(|&row| matrix.row_sum(row) == 0)
        .collect();
    if !unassigned.is_empty() {
        return Err(ResolveError::UnassignedMarker {
            source_id: source_id.to_string(),
            markers: unassigned,
        });
    }

    let mut resolved = matrix.clone();
    resolved.prune_empty_columns();

    let unknown = unknown_acronyms(resolved.column_names(), ontology);
    if !unknown.is_empty() {
        return Err(ResolveError::UnknownAcronym {
            source_id: source_id.to_string(),
            acronyms: unknown,
        });
    }

    // Decide every ambiguous row against the pruned matrix before writing
    let ambiguous: Vec<usize> = (0..resolved.n_rows())
        .filter(|&row| resolved.row_sum(row) > 1)
        .collect();
    debug!(source_id, ambiguous = ambiguous.len(); "Resolving ambiguous markers");

    let mut suppressed = Vec::with_capacity(ambiguous.len());
    for &row in &ambiguous {
        let shallow = shallower_region(&resolved, row, ontology, source_id)?;
        trace!(source_id, marker = row, region = shallow; "Marker moved to deeper region");
        suppressed.push((row, shallow.to_string()));
    }
    for (row, region) in &suppressed {
        resolved.clear(*row, region);
    }
    resolved.prune_empty_columns();

    for row in 0..resolved.n_rows() {
        let sum = resolved.row_sum(row);
        if sum != 1 {
            error!(source_id, marker = row, sum; "Resolved marker is not in exactly one region");
            return Err(ResolveError::InvariantViolation {
                source_id: source_id.to_string(),
                marker: row,
                sum,
            });
        }
    }

    Ok(resolved)
}

/// Returns the names that `ontology` does not know, in input order
fn unknown_acronyms<'a, O: Ontology>(
    names: impl IntoIterator<Item = &'a str>,
    ontology: &O,
) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| ontology.lookup(name).is_none())
        .map(str::to_string)
        .collect()
}

/// Picks the region an ambiguous marker must leave.
///
/// The marker's two regions are sorted shallow-first by the ontology order;
/// the shallow one is returned if it contains the deep one.
fn shallower_region<'m, O: Ontology>(
    matrix: &'m MembershipMatrix,
    row: usize,
    ontology: &O,
    source_id: &str,
) -> Result<&'m str, ResolveError> {
    let names = matrix.row_regions(row);

    let unknown = unknown_acronyms(names.iter().copied(), ontology);
    if !unknown.is_empty() {
        return Err(ResolveError::UnknownAcronym {
            source_id: source_id.to_string(),
            acronyms: unknown,
        });
    }

    let mut candidates: Vec<(&str, &O::Node)> = names
        .iter()
        .filter_map(|&name| ontology.lookup(name).map(|node| (name, node)))
        .collect();

    let [shallow, deep] = candidates.as_mut_slice() else {
        return Err(ResolveError::TooManyRegions {
            source_id: source_id.to_string(),
            marker: row,
            regions: names.iter().map(|name| name.to_string()).collect(),
        });
    };
    if deep.1 < shallow.1 {
        std::mem::swap(shallow, deep);
    }

    if !shallow.1.contains(deep.1) {
        return Err(ResolveError::DisjointRegions {
            source_id: source_id.to_string(),
            marker: row,
            shallow: shallow.0.to_string(),
            deep: deep.0.to_string(),
        });
    }

    Ok(shallow.0)
}
