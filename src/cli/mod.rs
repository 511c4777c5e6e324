//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialize logging
//! - Delegate to command handlers
//!
//! The CLI layer is thin: all session and API behavior lives in the
//! library modules.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::Result;

use crate::ui::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    commands::dispatch(cli.command, verbosity).await
}

/// Initialize the tracing subscriber.
///
/// `--debug` turns on debug-level logs for this crate; otherwise
/// `RUST_LOG` applies with a `warn` fallback.
fn init_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if debug {
        EnvFilter::new("keeptab=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
