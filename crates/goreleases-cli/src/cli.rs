//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use goreleases_core::catalog::host_arch;
use goreleases_core::catalog::host_os;
use goreleases_core::config::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(name = "goreleases")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Download server serving release files and the JSON catalog
    #[arg(
        long,
        global = true,
        env = "GORELEASES_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        value_name = "URL"
    )]
    pub base_url: String,

    /// Abort requests that take longer than this many seconds
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available Go releases
    List(ListArgs),
    /// Download, verify and unpack a Go release
    #[command(disable_version_flag = true)]
    Fetch(FetchArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Include archived releases
    #[arg(short, long)]
    pub all: bool,

    /// Show the files of each release
    #[arg(short, long)]
    pub long: bool,
}

#[derive(clap::Args)]
pub struct FetchArgs {
    /// Directory to create the `go` tree in
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Release to fetch, e.g. 1.21.0 or go1.21.0 (default: latest stable)
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// Target operating system in Go naming
    #[arg(long, default_value = host_os())]
    pub os: String,

    /// Target architecture in Go naming
    #[arg(long, default_value = host_arch())]
    pub arch: String,

    /// Fetch this release file directly instead of looking it up
    #[arg(long, value_name = "FILENAME", requires = "sha256")]
    pub filename: Option<String>,

    /// Expected SHA-256 of --filename, in hex
    #[arg(long, value_name = "HEX", requires = "filename")]
    pub sha256: Option<String>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
