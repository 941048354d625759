//! Human-readable output formatter with colors and styling.

use std::path::Path;

use anyhow::Result;
use console::Term;
use console::style;
use goreleases_core::FetchReport;
use goreleases_core::Release;
use goreleases_core::ReleaseFile;

use super::formatter::OutputFormatter;
use crate::progress::humanize_bytes;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn platform(file: &ReleaseFile) -> String {
        if file.os.is_empty() {
            "source".to_string()
        } else {
            format!("{}/{}", file.os, file.arch)
        }
    }

    fn release_line(&self, release: &Release) -> String {
        if release.stable {
            release.version.clone()
        } else if self.use_colors {
            format!("{} {}", release.version, style("(unstable)").yellow())
        } else {
            format!("{} (unstable)", release.version)
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_fetch_result(
        &self,
        file: &ReleaseFile,
        root: &Path,
        report: &FetchReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let headline = format!(
            "Installed {} ({}) into {}",
            file.version,
            Self::platform(file),
            root.display()
        );
        if self.use_colors {
            self.term
                .write_line(&format!("{} {headline}", style("✓").green().bold()))?;
        } else {
            self.term.write_line(&headline)?;
        }

        self.term.write_line(&format!(
            "  Files:        {}",
            Self::format_number(report.files)
        ))?;
        self.term.write_line(&format!(
            "  Directories:  {}",
            Self::format_number(report.directories)
        ))?;
        self.term.write_line(&format!(
            "  Downloaded:   {}",
            humanize_bytes(report.bytes_downloaded)
        ))?;
        self.term.write_line(&format!(
            "  Unpacked:     {}",
            humanize_bytes(report.bytes_written)
        ))?;

        if self.verbose {
            self.term
                .write_line(&format!("  Symlinks:     {}", report.symlinks))?;
            self.term
                .write_line(&format!("  Hard links:   {}", report.hardlinks))?;
            self.term
                .write_line(&format!("  Skipped:      {}", report.entries_skipped))?;
            self.term
                .write_line(&format!("  SHA-256:      {}", report.digest))?;
            self.term
                .write_line(&format!("  Duration:     {:?}", report.duration))?;
        }

        Ok(())
    }

    fn format_releases(&self, releases: &[Release], long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for release in releases {
            self.term.write_line(&self.release_line(release))?;
            if !long {
                continue;
            }
            for file in &release.files {
                self.term.write_line(&format!(
                    "  {:<9} {:<15} {:>10}  {}",
                    file.kind.as_str(),
                    Self::platform(file),
                    humanize_bytes(file.size),
                    file.filename
                ))?;
            }
        }

        if long || self.verbose {
            self.term.write_line("")?;
            self.term.write_line(&format!(
                "Total: {} releases",
                Self::format_number(releases.len())
            ))?;
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("WARNING: {message}"));
        }
    }
}
