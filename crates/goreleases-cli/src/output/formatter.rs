//! Output formatter trait for CLI results.

use std::path::Path;

use anyhow::Result;
use goreleases_core::FetchReport;
use goreleases_core::Release;
use goreleases_core::ReleaseFile;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a completed fetch into `root`
    fn format_fetch_result(
        &self,
        file: &ReleaseFile,
        root: &Path,
        report: &FetchReport,
    ) -> Result<()>;

    /// Format a release listing
    fn format_releases(&self, releases: &[Release], long: bool) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
