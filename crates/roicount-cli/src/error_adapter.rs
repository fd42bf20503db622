//! Error adapter for converting RoiCountError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Each error kind
//! gets a stable code and, where the fix is known, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan};

use roicount::{ResolveError, RoiCountError};

/// Adapter for a [`RoiCountError`].
///
/// Wraps the error and implements [`MietteDiagnostic`] to enable rich error
/// formatting in the CLI.
pub struct ErrorAdapter<'a>(pub &'a RoiCountError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            RoiCountError::Io(_) => "roicount::io",
            RoiCountError::Read { .. } => "roicount::read",
            RoiCountError::Section { .. } => "roicount::section",
            RoiCountError::Ontology(_) => "roicount::ontology",
            RoiCountError::NoSections { .. } => "roicount::no_sections",
            RoiCountError::Resolve(err) => match err {
                ResolveError::UnassignedMarker { .. } => "roicount::unassigned_marker",
                ResolveError::UnknownAcronym { .. } => "roicount::unknown_acronym",
                ResolveError::TooManyRegions { .. } => "roicount::too_many_regions",
                ResolveError::DisjointRegions { .. } => "roicount::disjoint_regions",
                ResolveError::InvariantViolation { .. } => "roicount::invariant_violation",
            },
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            RoiCountError::Resolve(err) => match err {
                ResolveError::UnassignedMarker { .. } => {
                    "fix the annotation: every marker must lie inside a region outline"
                }
                ResolveError::UnknownAcronym { .. } => {
                    "check the region names for typos; acronyms are case-sensitive"
                }
                ResolveError::TooManyRegions { .. } => {
                    "markers in more than two regions need manual review"
                }
                ResolveError::DisjointRegions { .. } => {
                    "the outlines overlap although neither structure contains the other; fix the annotation"
                }
                ResolveError::InvariantViolation { .. } => {
                    "this is a bug in roicount, not in the input data; please report it"
                }
            },
            RoiCountError::NoSections { .. } => {
                "check the input directory or set `extension` in the [batch] configuration"
            }
            RoiCountError::Section { .. } => {
                "section files hold `markers`, `regions` and an optional `metadata` object"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Render an error as a graphical miette report.
pub fn render(err: &RoiCountError) -> String {
    let reporter = GraphicalReportHandler::new();
    let mut writer = String::new();
    if reporter.render_report(&mut writer, &ErrorAdapter(err)).is_err() {
        // Fall back to the plain message
        writer = err.to_string();
    }
    writer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_acronym() -> RoiCountError {
        RoiCountError::Resolve(ResolveError::UnknownAcronym {
            source_id: "slice-07.json".to_string(),
            acronyms: vec!["XYZ".to_string()],
        })
    }

    #[test]
    fn test_resolve_error_code_and_help() {
        let err = unknown_acronym();
        let adapter = ErrorAdapter(&err);

        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("roicount::unknown_acronym")
        );
        assert!(adapter.help().unwrap().to_string().contains("case-sensitive"));
        assert_eq!(adapter.to_string(), "slice-07.json: unknown acronym(s) XYZ");
    }

    #[test]
    fn test_invariant_violation_is_reported_as_bug() {
        let err = RoiCountError::Resolve(ResolveError::InvariantViolation {
            source_id: "s.json".to_string(),
            marker: 3,
            sum: 2,
        });
        let adapter = ErrorAdapter(&err);

        assert!(adapter.help().unwrap().to_string().contains("bug"));
    }

    #[test]
    fn test_io_error_has_code_without_help() {
        let err = RoiCountError::Io(std::io::Error::other("disk full"));
        let adapter = ErrorAdapter(&err);

        assert_eq!(
            adapter.code().map(|c| c.to_string()).as_deref(),
            Some("roicount::io")
        );
        assert!(adapter.help().is_none());
    }

    #[test]
    fn test_render_includes_message_and_code() {
        let report = render(&unknown_acronym());
        assert!(report.contains("XYZ"));
        assert!(report.contains("roicount::unknown_acronym"));
    }
}
