//! Progress bar implementation for CLI operations.

use std::fmt::Write;
use std::path::Path;

use console::Term;
use goreleases_core::ProgressCallback;
use indicatif::ProgressBar;
use indicatif::ProgressDrawTarget;
use indicatif::ProgressState;
use indicatif::ProgressStyle;

/// Download progress bar implementing `ProgressCallback`.
///
/// The bar tracks raw bytes received against the announced content length
/// and shows the entry being unpacked. Without a length it falls back to a
/// spinner. Cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Creates a hidden bar; it appears once the download starts.
    #[must_use]
    pub fn new(filename: &str) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_prefix(filename.to_string());
        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    fn bar_style() -> ProgressStyle {
        // "go1.21.0.linux-amd64.tar.gz [████████░░░░] 15.2 MB/64.1 MB (5.1 MB/s, 12s) go/src/..."
        ProgressStyle::default_bar()
            .template(
                "{prefix} [{bar:40.cyan/blue}] {bytes}/{total} ({bytes_per_sec}, {eta}) {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_bytes(state.pos())).unwrap_or(());
            })
            .with_key("total", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_bytes(state.len().unwrap_or(0))).unwrap_or(());
            })
            .with_key("bytes_per_sec", |state: &ProgressState, w: &mut dyn Write| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let bytes_per_sec = state.per_sec() as u64;
                write!(w, "{}/s", humanize_bytes(bytes_per_sec)).unwrap_or(());
            })
            .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
            })
            .progress_chars("█▓░")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner} {prefix} {bytes} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{}", humanize_bytes(state.pos())).unwrap_or(());
            })
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_download_start(&mut self, content_length: Option<u64>) {
        match content_length {
            Some(len) => {
                self.bar.set_length(len);
                self.bar.set_style(Self::bar_style());
            }
            None => self.bar.set_style(Self::spinner_style()),
        }
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn on_entry(&mut self, path: &Path, downloaded: u64) {
        self.bar.set_position(downloaded);
        self.bar.set_message(path.display().to_string());
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
