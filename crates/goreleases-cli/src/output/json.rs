//! JSON output formatter for machine-readable results.

use std::io;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use goreleases_core::FetchReport;
use goreleases_core::Release;
use goreleases_core::ReleaseFile;
use serde::Serialize;

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct FetchOutput<'a> {
    version: &'a str,
    filename: &'a str,
    os: &'a str,
    arch: &'a str,
    root: String,
    sha256: &'a str,
    files: usize,
    directories: usize,
    symlinks: usize,
    hardlinks: usize,
    entries_skipped: usize,
    bytes_written: u64,
    bytes_downloaded: u64,
    duration_ms: u128,
}

impl<'a> FetchOutput<'a> {
    fn new(file: &'a ReleaseFile, root: &Path, report: &'a FetchReport) -> Self {
        Self {
            version: &file.version,
            filename: &file.filename,
            os: &file.os,
            arch: &file.arch,
            root: root.display().to_string(),
            sha256: &report.digest,
            files: report.files,
            directories: report.directories,
            symlinks: report.symlinks,
            hardlinks: report.hardlinks,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            bytes_downloaded: report.bytes_downloaded,
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_fetch_result(
        &self,
        file: &ReleaseFile,
        root: &Path,
        report: &FetchReport,
    ) -> Result<()> {
        Self::output(&JsonOutput::success(
            "fetch",
            FetchOutput::new(file, root, report),
        ))
    }

    fn format_releases(&self, releases: &[Release], long: bool) -> Result<()> {
        #[derive(Serialize)]
        struct ReleaseSummary<'a> {
            version: &'a str,
            stable: bool,
        }

        if long {
            Self::output(&JsonOutput::success("list", releases))
        } else {
            let summaries: Vec<_> = releases
                .iter()
                .map(|r| ReleaseSummary {
                    version: &r.version,
                    stable: r.stable,
                })
                .collect();
            Self::output(&JsonOutput::success("list", summaries))
        }
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("error", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let _ = Self::output(&JsonOutput::success("warning", WarningData { message }));
    }
}
