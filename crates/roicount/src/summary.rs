//! Grouping region counts into major brain divisions.

use std::fmt::Write;

use log::{debug, warn};

use roicount_core::{
    color::Color,
    ontology::{Ontology, StructureNode},
};

use crate::RegionCounts;

/// One region of a [`DivisionSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    region: String,
    count: usize,
    level: usize,
    division: Option<String>,
    color: Option<Color>,
}

impl SummaryRow {
    /// Returns the region acronym
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the number of markers in the region
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the index of the division, or the number of divisions when
    /// the region belongs to none
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the division acronym, if the region belongs to one
    pub fn division(&self) -> Option<&str> {
        self.division.as_deref()
    }

    /// Returns the display color of the region, if the ontology has one
    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

/// Region counts ordered by the major division each region falls in.
///
/// A region belongs to the deepest configured division that is the region
/// itself or one of its ancestors, so nested divisions may be listed in any
/// order (hippocampus wins over cortex). The level of a row is the position
/// of its division in the configured list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionSummary {
    rows: Vec<SummaryRow>,
}

impl DivisionSummary {
    /// Builds the summary of `counts`.
    ///
    /// Rows are sorted by level; inside a level they keep the order of
    /// `counts`. Divisions missing from the ontology are skipped with a
    /// warning but keep their level.
    pub fn build<O, S>(counts: &RegionCounts, ontology: &O, divisions: &[S]) -> Self
    where
        O: Ontology,
        S: AsRef<str>,
    {
        let division_nodes: Vec<(&str, Option<&O::Node>)> = divisions
            .iter()
            .map(|acronym| {
                let acronym = acronym.as_ref();
                let node = ontology.lookup(acronym);
                if node.is_none() {
                    warn!(division = acronym; "Division not found in ontology");
                }
                (acronym, node)
            })
            .collect();

        let mut rows: Vec<SummaryRow> = counts
            .iter()
            .map(|(region, count)| {
                let node = ontology.lookup(region);
                let matched = node.and_then(|node| {
                    division_nodes
                        .iter()
                        .enumerate()
                        .filter_map(|(level, (acronym, division))| {
                            let division = (*division)?;
                            (division == node || division.contains(node))
                                .then_some((level, *acronym, division))
                        })
                        // Matching divisions are ancestors of one another
                        .max_by(|(_, _, a), (_, _, b)| a.cmp(b))
                        .map(|(level, acronym, _)| (level, acronym))
                });
                let (level, division) = match matched {
                    Some((level, acronym)) => (level, Some(acronym.to_string())),
                    None => (divisions.len(), None),
                };
                SummaryRow {
                    region: region.to_string(),
                    count,
                    level,
                    division,
                    color: node.and_then(|node| node.color()),
                }
            })
            .collect();
        rows.sort_by_key(SummaryRow::level);

        debug!(rows = rows.len(), divisions = divisions.len(); "Division summary built");

        Self { rows }
    }

    /// Returns the rows, sorted by level
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Returns the number of markers over all rows
    pub fn total(&self) -> usize {
        self.rows.iter().map(SummaryRow::count).sum()
    }

    /// Renders the summary as tab-separated values with a header line.
    ///
    /// Missing divisions and colors are written as empty fields.
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("region\tcount\tlevel\tdivision\tcolor\n");
        for row in &self.rows {
            // Writing to a String cannot fail
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                row.region,
                row.count,
                row.level,
                row.division.as_deref().unwrap_or_default(),
                row.color.map(Color::to_hex).unwrap_or_default(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use roicount_core::ontology::{StructureRecord, StructureTree};

    use super::*;
    use crate::config::DEFAULT_DIVISIONS;

    fn tree() -> StructureTree {
        StructureTree::from_records([
            StructureRecord::new(1, "root", "Root", None),
            StructureRecord::new(2, "CTX", "Cerebral cortex", Some(1)).with_color("B0FFB8"),
            StructureRecord::new(3, "HPF", "Hippocampal formation", Some(2)),
            StructureRecord::new(4, "CA1", "Field CA1", Some(3)).with_color("7ED04B"),
            StructureRecord::new(5, "MO", "Somatomotor areas", Some(2)),
            StructureRecord::new(6, "CNU", "Cerebral nuclei", Some(1)),
            StructureRecord::new(7, "ACB", "Nucleus accumbens", Some(6)),
            StructureRecord::new(8, "TH", "Thalamus", Some(1)),
            StructureRecord::new(9, "fiber tracts", "Fiber tracts", Some(1)),
        ])
        .unwrap()
    }

    #[test]
    fn test_regions_grouped_by_deepest_matching_division() {
        let counts: RegionCounts = [("MO", 4), ("TH", 2), ("CA1", 3), ("ACB", 1), ("fiber tracts", 5)]
            .into_iter()
            .collect();

        let summary = DivisionSummary::build(&counts, &tree(), &DEFAULT_DIVISIONS);

        let rows: Vec<_> = summary
            .rows()
            .iter()
            .map(|row| (row.region(), row.level(), row.division()))
            .collect();
        assert_eq!(
            rows,
            [
                ("MO", 0, Some("CTX")),
                ("ACB", 1, Some("CNU")),
                ("CA1", 2, Some("HPF")),
                ("TH", 3, Some("TH")),
                ("fiber tracts", 8, None),
            ]
        );
        assert_eq!(summary.total(), 15);
    }

    #[test]
    fn test_nested_division_wins_regardless_of_order() {
        let counts: RegionCounts = [("CA1", 3)].into_iter().collect();

        let outer_first = DivisionSummary::build(&counts, &tree(), &["CTX", "HPF"]);
        let inner_first = DivisionSummary::build(&counts, &tree(), &["HPF", "CTX"]);

        assert_eq!(outer_first.rows()[0].division(), Some("HPF"));
        assert_eq!(outer_first.rows()[0].level(), 1);
        assert_eq!(inner_first.rows()[0].division(), Some("HPF"));
        assert_eq!(inner_first.rows()[0].level(), 0);
    }

    #[test]
    fn test_default_division_levels() {
        let tree = StructureTree::from_records([
            StructureRecord::new(1, "root", "Root", None),
            StructureRecord::new(2, "CTX", "Cerebral cortex", Some(1)),
            StructureRecord::new(3, "MOp", "Primary motor area", Some(2)),
            StructureRecord::new(4, "HPF", "Hippocampal formation", Some(2)),
            StructureRecord::new(5, "CA1", "Field CA1", Some(4)),
            StructureRecord::new(6, "CNU", "Cerebral nuclei", Some(1)),
            StructureRecord::new(7, "ACB", "Nucleus accumbens", Some(6)),
        ])
        .unwrap();
        let counts: RegionCounts = [("CA1", 1), ("ACB", 1), ("MOp", 1)].into_iter().collect();

        let summary = DivisionSummary::build(&counts, &tree, &DEFAULT_DIVISIONS);

        let levels: Vec<_> = summary
            .rows()
            .iter()
            .map(|row| (row.region(), row.level()))
            .collect();
        assert_eq!(levels, [("MOp", 0), ("ACB", 1), ("CA1", 2)]);
    }

    #[test]
    fn test_sort_is_stable_within_level() {
        let counts: RegionCounts = [("TH", 1), ("MO", 2), ("CTX", 3), ("CA1", 4)]
            .into_iter()
            .collect();

        let summary = DivisionSummary::build(&counts, &tree(), &["CTX", "TH"]);

        let regions: Vec<_> = summary.rows().iter().map(SummaryRow::region).collect();
        assert_eq!(regions, ["MO", "CTX", "CA1", "TH"]);
    }

    #[test]
    fn test_unknown_division_keeps_its_level() {
        let counts: RegionCounts = [("TH", 1)].into_iter().collect();

        let summary = DivisionSummary::build(&counts, &tree(), &["XYZ", "TH"]);

        assert_eq!(summary.rows()[0].level(), 1);
    }

    #[test]
    fn test_region_unknown_to_ontology_is_unmatched() {
        let counts: RegionCounts = [("XYZ", 2)].into_iter().collect();

        let summary = DivisionSummary::build(&counts, &tree(), &["CTX"]);

        assert_eq!(summary.rows()[0].level(), 1);
        assert_eq!(summary.rows()[0].division(), None);
        assert_eq!(summary.rows()[0].color(), None);
    }

    #[test]
    fn test_to_tsv() {
        let counts: RegionCounts = [("CA1", 3), ("fiber tracts", 1)].into_iter().collect();

        let tsv = DivisionSummary::build(&counts, &tree(), &["HPF"]).to_tsv();

        assert_eq!(
            tsv,
            "region\tcount\tlevel\tdivision\tcolor\n\
             CA1\t3\t0\tHPF\t#7ed04b\n\
             fiber tracts\t1\t1\t\t\n"
        );
    }

    #[test]
    fn test_empty_counts() {
        let summary = DivisionSummary::build(&RegionCounts::new(), &tree(), &DEFAULT_DIVISIONS);
        assert!(summary.rows().is_empty());
        assert_eq!(summary.to_tsv(), "region\tcount\tlevel\tdivision\tcolor\n");
    }
}
