//! List command implementation

use anyhow::Result;
use goreleases_core::FetchConfig;
use goreleases_core::list_releases;

use crate::cli::ListArgs;
use crate::error::convert_fetch_error;
use crate::output::OutputFormatter;

pub fn execute(args: &ListArgs, config: &FetchConfig, formatter: &dyn OutputFormatter) -> Result<()> {
    let releases = list_releases(config, args.all)
        .map_err(|e| convert_fetch_error(e, &format!("release catalog from {}", config.base_url)))?;

    formatter.format_releases(&releases, args.long)
}
