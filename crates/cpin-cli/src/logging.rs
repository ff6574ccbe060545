use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format},
    prelude::*,
};

type FileLayer<S> = fmt::Layer<S, format::DefaultFields, format::Format, File>;

/// Maps the `-v`/`-q` flags to the most verbose level that is still logged.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Plain-text layer writing to a newly created file at `path`.
fn file_layer<S>(path: &Path) -> Result<FileLayer<S>> {
    let file = File::create(path).map_err(CliError::Io)?;
    Ok(fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true))
}

/// Installs the global subscriber. Logs go to stderr, and to `log_file` when
/// given; stdout stays free for the cpin record.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        subscriber.with(file_layer(path)?).init();
    } else {
        subscriber.init();
    }

    Ok(())
}
