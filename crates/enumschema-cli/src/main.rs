//! enumschema CLI.
//!
//! Generates an OpenAPI string enum schema, or any templated file, from the
//! integer constants of a Go type.
//!
//! # Examples
//!
//! ```bash
//! enumschema --type Fruit --trimprefix F --transform snake --indent ./fruit
//! ```

use anyhow::Result;
use clap::Parser;
use enumschema_cli::commands::generate;
use enumschema_cli::{Cli, ExitCode};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let exit_code = match generate::run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from_error(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes the logging system.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` is honored with an
/// `info` default. Logs go to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
