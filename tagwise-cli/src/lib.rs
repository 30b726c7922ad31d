//! Command-line interface for classifying map elements with tagwise.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use env_logger::Env;

mod classify;
mod error;

pub use error::CliError;

use classify::{ClassifyArgs, run_classify};

pub(crate) const ARG_FEATURES: &str = "features";
pub(crate) const ARG_ELEMENTS: &str = "elements";
pub(crate) const ARG_BEST: &str = "best";
pub(crate) const ARG_NO_FALLBACKS: &str = "no-fallbacks";
pub(crate) const ENV_FEATURES: &str = "TAGWISE_CMDS_CLASSIFY_FEATURES";
pub(crate) const ENV_ELEMENTS: &str = "TAGWISE_CMDS_CLASSIFY_ELEMENTS";

/// Level shown when `RUST_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr logger for the `log` facade.
///
/// Warnings are shown by default; `RUST_LOG` overrides the filter.
///
/// # Errors
/// Returns [`log::SetLoggerError`] when a logger is already installed.
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    logger_builder(Env::default()).try_init()
}

pub(crate) fn logger_builder(env: Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or(DEFAULT_LOG_FILTER))
}

/// Run the tagwise CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments, configuration, inputs or output
/// fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Classify(args) => run_classify(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tagwise",
    about = "Describe OpenStreetMap elements using feature definitions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match elements against feature definitions and report the results.
    Classify(ClassifyArgs),
}

#[cfg(test)]
mod tests;
