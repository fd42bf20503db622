//! Counting a directory of section files.
//!
//! Sections are independent, so they are counted in parallel and their
//! counts merged afterwards in file order. A failing section is either
//! skipped with a warning or, with [`BatchConfig::fail_fast`], aborts the
//! whole batch.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use rayon::prelude::*;

use roicount_core::{ontology::Ontology, section::Section};

use crate::{RegionCounts, RoiCountError, config::BatchConfig, counts::count_section};

/// A section file that could not be counted
#[derive(Debug)]
pub struct SectionFailure {
    path: PathBuf,
    error: RoiCountError,
}

impl SectionFailure {
    /// Returns the path of the failing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the reason the file was skipped
    pub fn error(&self) -> &RoiCountError {
        &self.error
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    counts: RegionCounts,
    processed: Vec<PathBuf>,
    failures: Vec<SectionFailure>,
}

impl BatchReport {
    /// Returns the counts merged over every successful section
    pub fn counts(&self) -> &RegionCounts {
        &self.counts
    }

    /// Returns the files that were counted, in file order
    pub fn processed(&self) -> &[PathBuf] {
        &self.processed
    }

    /// Returns the files that were skipped, in file order
    pub fn failures(&self) -> &[SectionFailure] {
        &self.failures
    }
}

/// Lists the files in `dir` whose extension matches `extension`, sorted by path.
///
/// The comparison ignores ASCII case. Subdirectories are not searched.
///
/// # Errors
///
/// Returns [`RoiCountError::Read`] if the directory cannot be listed.
pub fn collect_section_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, RoiCountError> {
    let read_error = |source| RoiCountError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Reads and validates one section file.
///
/// # Errors
///
/// Returns [`RoiCountError::Read`] if the file cannot be read and
/// [`RoiCountError::Section`] if its content is not a valid section.
pub fn load_section(path: &Path) -> Result<Section, RoiCountError> {
    let source = fs::read_to_string(path).map_err(|source| RoiCountError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Section::from_json(&source).map_err(|source| RoiCountError::Section {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and counts one section file, identified by its file name.
///
/// # Errors
///
/// Returns the error of [`load_section`] or the [`ResolveError`](crate::ResolveError)
/// of the section.
pub fn count_file<O: Ontology>(path: &Path, ontology: &O) -> Result<RegionCounts, RoiCountError> {
    let section = load_section(path)?;
    let counts = count_section(&section, ontology, &source_id(path))?;
    Ok(counts)
}

/// Counts every section file of `dir` and merges the results.
///
/// # Errors
///
/// Returns [`RoiCountError::NoSections`] if `dir` holds no matching file,
/// [`RoiCountError::Read`] if it cannot be listed, and with
/// [`BatchConfig::fail_fast`] the error of the first failing file.
pub fn run<O: Ontology>(
    dir: &Path,
    ontology: &O,
    config: &BatchConfig,
) -> Result<BatchReport, RoiCountError> {
    let files = collect_section_files(dir, config.extension())?;
    if files.is_empty() {
        return Err(RoiCountError::NoSections {
            dir: dir.to_path_buf(),
            extension: config.extension().to_string(),
        });
    }
    info!(
        dir = dir.display().to_string(),
        files = files.len();
        "Counting sections"
    );

    let results: Vec<Result<RegionCounts, RoiCountError>> = files
        .par_iter()
        .map(|path| count_file(path, ontology))
        .collect();

    let mut report = BatchReport::default();
    for (path, result) in files.into_iter().zip(results) {
        match result {
            Ok(counts) => {
                debug!(path = path.display().to_string(), markers = counts.total(); "Section merged");
                report.counts.merge(&counts);
                report.processed.push(path);
            }
            Err(error) if config.fail_fast() => {
                warn!(path = path.display().to_string(); "Aborting batch on failing section");
                return Err(error);
            }
            Err(error) => {
                warn!(
                    path = path.display().to_string(),
                    error = error.to_string();
                    "Skipping section"
                );
                report.failures.push(SectionFailure { path, error });
            }
        }
    }

    info!(
        processed = report.processed.len(),
        skipped = report.failures.len(),
        markers = report.counts.total();
        "Batch finished"
    );

    Ok(report)
}

fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use roicount_core::ontology::{StructureRecord, StructureTree};

    use super::*;
    use crate::ResolveError;

    const CTX_ACB: &str = r#"{
        "markers": [[10, 10], [50, 50], [90, 90]],
        "regions": [
            {"name": "CTX", "vertices": [[0, 0], [100, 0], [100, 100], [0, 100]]},
            {"name": "ACB", "vertices": [[40, 40], [60, 40], [60, 60], [40, 60]]}
        ]
    }"#;

    const TH_ONLY: &str = r#"{
        "markers": [[5, 5], [6, 6], [7, 7]],
        "regions": [{"name": "TH", "vertices": [[0, 0], [10, 0], [10, 10], [0, 10]]}]
    }"#;

    const OUTSIDE: &str = r#"{
        "markers": [[500, 500]],
        "regions": [{"name": "TH", "vertices": [[0, 0], [10, 0], [10, 10], [0, 10]]}]
    }"#;

    fn tree() -> StructureTree {
        StructureTree::from_records([
            StructureRecord::new(1, "root", "Root", None),
            StructureRecord::new(2, "CTX", "Cerebral cortex", Some(1)),
            StructureRecord::new(3, "ACB", "Nucleus accumbens", Some(2)),
            StructureRecord::new(4, "TH", "Thalamus", Some(1)),
        ])
        .unwrap()
    }

    fn write_sections(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_collect_section_files_sorted_and_filtered() {
        let dir = write_sections(&[
            ("b.json", "{}"),
            ("a.JSON", "{}"),
            ("notes.txt", ""),
            ("c.json.bak", ""),
        ]);
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = collect_section_files(dir.path(), "json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, ["a.JSON", "b.json"]);
    }

    #[test]
    fn test_collect_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = collect_section_files(&missing, "json").unwrap_err();
        assert!(matches!(err, RoiCountError::Read { path, .. } if path == missing));
    }

    #[test]
    fn test_load_section_reports_path() {
        let dir = write_sections(&[("bad.json", r#"{"markers": []}"#)]);
        let path = dir.path().join("bad.json");
        let err = load_section(&path).unwrap_err();
        assert!(matches!(err, RoiCountError::Section { path: p, .. } if p == path));
    }

    #[test]
    fn test_count_file_uses_file_name_as_source_id() {
        let dir = write_sections(&[("outside.json", OUTSIDE)]);
        let err = count_file(&dir.path().join("outside.json"), &tree()).unwrap_err();
        match err {
            RoiCountError::Resolve(ResolveError::UnassignedMarker { source_id, markers }) => {
                assert_eq!(source_id, "outside.json");
                assert_eq!(markers, [0]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_merges_counts() {
        let dir = write_sections(&[("s1.json", CTX_ACB), ("s2.json", TH_ONLY), ("s3.json", CTX_ACB)]);

        let report = run(dir.path(), &tree(), &BatchConfig::default()).unwrap();

        assert_eq!(report.processed().len(), 3);
        assert!(report.failures().is_empty());
        assert_eq!(report.counts().get("CTX"), 4);
        assert_eq!(report.counts().get("ACB"), 2);
        assert_eq!(report.counts().get("TH"), 3);
        assert_eq!(report.counts().total(), 9);
    }

    #[test]
    fn test_run_skips_failing_sections() {
        let dir = write_sections(&[
            ("a.json", CTX_ACB),
            ("b.json", OUTSIDE),
            ("c.json", "not json"),
            ("d.json", TH_ONLY),
        ]);

        let report = run(dir.path(), &tree(), &BatchConfig::default()).unwrap();

        assert_eq!(report.processed().len(), 2);
        let failed: Vec<_> = report
            .failures()
            .iter()
            .map(|f| f.path().file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(failed, ["b.json", "c.json"]);
        assert!(matches!(report.failures()[0].error(), RoiCountError::Resolve(_)));
        assert!(matches!(report.failures()[1].error(), RoiCountError::Section { .. }));
        assert_eq!(report.counts().total(), 6);
    }

    #[test]
    fn test_run_fail_fast_returns_first_failure_in_file_order() {
        let dir = write_sections(&[("a.json", CTX_ACB), ("b.json", "not json"), ("c.json", OUTSIDE)]);

        let err = run(dir.path(), &tree(), &BatchConfig::new("json", true)).unwrap_err();

        assert!(matches!(err, RoiCountError::Section { path, .. } if path.ends_with("b.json")));
    }

    #[test]
    fn test_run_empty_directory() {
        let dir = write_sections(&[("readme.txt", "")]);
        let err = run(dir.path(), &tree(), &BatchConfig::default()).unwrap_err();
        assert!(matches!(err, RoiCountError::NoSections { extension, .. } if extension == "json"));
    }
}
