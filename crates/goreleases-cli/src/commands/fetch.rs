//! Fetch command implementation.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use goreleases_core::CancelToken;
use goreleases_core::FetchConfig;
use goreleases_core::FileKind;
use goreleases_core::Fetcher;
use goreleases_core::HttpTransport;
use goreleases_core::NoopProgress;
use goreleases_core::ReleaseFile;
use goreleases_core::catalog;
use tracing::info;
use tracing::warn;

use crate::cli::FetchArgs;
use crate::error::convert_fetch_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;

/// Exit status after a second Ctrl-C, as for a process killed by SIGINT.
const ABORT_EXIT_CODE: i32 = 130;

pub fn execute(
    args: &FetchArgs,
    config: &FetchConfig,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let transport =
        HttpTransport::new(config).map_err(|e| convert_fetch_error(e, &config.base_url))?;
    let file = resolve_file(args, &transport, formatter)?;
    info!(filename = %file.filename, version = %file.version, "fetching release");

    let root = args.dest.join(&config.root_dir_name);
    let cancel = CancelToken::new();
    install_interrupt_handler(cancel.clone(), root.clone())?;

    let mut fetcher = Fetcher::new(&transport, config).with_cancel(cancel);
    let result = if show_progress {
        let mut progress = CliProgress::new(&file.filename);
        fetcher.fetch(&file, &args.dest, &mut progress)
    } else {
        fetcher.fetch(&file, &args.dest, &mut NoopProgress)
    };
    let report = result.map_err(|e| convert_fetch_error(e, &file.filename))?;

    formatter.format_fetch_result(&file, &root, &report)
}

/// Routes Ctrl-C to `cancel`.
///
/// The first interrupt cancels the fetch, which rolls back at its next read.
/// A read stalled on the network may never return, so a second interrupt
/// removes the extraction root itself and exits. The root is only removed
/// if it did not exist when the handler was installed.
fn install_interrupt_handler(cancel: CancelToken, root: PathBuf) -> Result<()> {
    let owned = fs::symlink_metadata(&root).is_err();

    ctrlc::set_handler(move || {
        if !cancel.is_cancelled() {
            cancel.cancel();
            warn!("interrupted, rolling back (press Ctrl-C again to abort)");
            return;
        }

        if owned {
            match fs::remove_dir_all(&root) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %root.display(), error = %e, "failed to remove partial tree"),
            }
        }
        std::process::exit(ABORT_EXIT_CODE);
    })
    .context("failed to set Ctrl-C handler")
}

/// Picks the release file to fetch.
///
/// An explicit `--filename`/`--sha256` pair is used as given and needs no
/// catalog request. Otherwise the catalog is consulted: supported releases
/// for the latest stable version, all releases for an explicit one.
fn resolve_file(
    args: &FetchArgs,
    transport: &HttpTransport,
    formatter: &dyn OutputFormatter,
) -> Result<ReleaseFile> {
    if let (Some(filename), Some(sha256)) = (&args.filename, &args.sha256) {
        return Ok(ReleaseFile {
            filename: filename.clone(),
            os: args.os.clone(),
            arch: args.arch.clone(),
            version: args.version.clone().unwrap_or_default(),
            sha256: sha256.clone(),
            size: 0,
            kind: FileKind::Archive,
        });
    }

    let subject = "release catalog";
    let release = match &args.version {
        Some(version) => {
            let releases =
                catalog::list_all(transport).map_err(|e| convert_fetch_error(e, subject))?;
            catalog::find_release(&releases, version)
                .cloned()
                .ok_or_else(|| {
                    anyhow!(
                        "Release {version} not found\n\
                         HINT: Run `goreleases list --all` to see published releases."
                    )
                })?
        }
        None => {
            let releases =
                catalog::list_supported(transport).map_err(|e| convert_fetch_error(e, subject))?;
            catalog::latest_stable(&releases)
                .cloned()
                .ok_or_else(|| anyhow!("The release catalog lists no stable release"))?
        }
    };

    if !release.stable {
        formatter.format_warning(&format!("{} is not a stable release", release.version));
    }

    catalog::find_file(&release, &args.os, &args.arch, FileKind::Archive)
        .cloned()
        .map_err(|e| convert_fetch_error(e, &release.version))
}
