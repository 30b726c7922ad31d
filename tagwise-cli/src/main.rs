//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tagwise_cli::CliError;

fn main() -> eyre::Result<()> {
    tagwise_cli::init_logging()?;
    match tagwise_cli::run() {
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        outcome => outcome.map_err(eyre::Report::from),
    }
}
