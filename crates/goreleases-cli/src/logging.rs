//! Logging initialisation.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Installs a stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level follows the flags:
/// warn by default, `-v` info, `-vv` debug, `-q` error.
pub fn init(verbose: u8, quiet: bool) {
    let debug = verbose > 1;
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, quiet).into())
        .from_env_lossy();

    let format = fmt::format()
        .without_time()
        .with_level(true)
        .with_target(debug);

    fmt()
        .with_env_filter(filter)
        .event_format(format)
        .with_writer(std::io::stderr)
        .with_file(debug)
        .with_line_number(debug)
        .init();
}

fn default_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}
