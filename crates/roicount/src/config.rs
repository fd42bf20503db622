//! Configuration types for Roicount batch runs.
//!
//! This module provides configuration structures that control how section
//! files are collected and how counts are summarised. All types implement
//! [`serde::Deserialize`] for loading from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining batch and summary settings.
//! - [`BatchConfig`] - Controls which files are read and how failures are handled.
//! - [`SummaryConfig`] - Controls the divisions counts are grouped into.
//!
//! # Example
//!
//! ```
//! # use roicount::config::AppConfig;
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.batch().extension(), "json");
//! assert!(!config.batch().fail_fast());
//! assert_eq!(config.summary().divisions()[0], "CTX");
//! ```

use serde::Deserialize;

/// Major divisions in output level order.
///
/// HPF lies inside CTX; regions below HPF are grouped under HPF.
pub const DEFAULT_DIVISIONS: [&str; 8] = ["CTX", "CNU", "HPF", "TH", "HY", "MB", "MY", "P"];

/// Top-level application configuration combining batch and summary settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Batch configuration section.
    #[serde(default)]
    batch: BatchConfig,

    /// Summary configuration section.
    #[serde(default)]
    summary: SummaryConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified batch and summary configurations.
    pub fn new(batch: BatchConfig, summary: SummaryConfig) -> Self {
        Self { batch, summary }
    }

    /// Returns the batch configuration.
    pub fn batch(&self) -> &BatchConfig {
        &self.batch
    }

    /// Returns the summary configuration.
    pub fn summary(&self) -> &SummaryConfig {
        &self.summary
    }

    /// Returns the configuration with `fail_fast` enabled when `fail_fast` is true.
    ///
    /// A false flag leaves the configured value in place, so a command line
    /// switch can only turn fail-fast on.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.batch.fail_fast |= fail_fast;
        self
    }
}

/// Settings for collecting and processing section files.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// File extension of section files, without the dot.
    extension: String,

    /// Abort the batch on the first failing section instead of skipping it.
    fail_fast: bool,
}

impl BatchConfig {
    /// Creates a new [`BatchConfig`].
    ///
    /// # Arguments
    ///
    /// * `extension` - File extension of section files, with or without a leading dot.
    /// * `fail_fast` - Whether the first failing section aborts the batch.
    pub fn new(extension: impl Into<String>, fail_fast: bool) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        Self {
            extension,
            fail_fast,
        }
    }

    /// Returns the section file extension.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Returns whether the first failing section aborts the batch.
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new("json", false)
    }
}

/// Settings for the division summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    /// Division acronyms in priority order.
    divisions: Vec<String>,
}

impl SummaryConfig {
    /// Creates a new [`SummaryConfig`] from division acronyms in priority order.
    pub fn new<S: Into<String>>(divisions: impl IntoIterator<Item = S>) -> Self {
        Self {
            divisions: divisions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the division acronyms in priority order.
    pub fn divisions(&self) -> &[String] {
        &self.divisions
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DIVISIONS)
    }
}
