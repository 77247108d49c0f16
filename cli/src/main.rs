#![deny(missing_docs)]

//! # oas-merge CLI
//!
//! Command Line Interface for the OpenAPI merge & publish toolchain.
//!
//! Supported Commands:
//! - `combine`: merges the configured sources into one document and
//!   publishes the artifact.
//! - `methods`: lists every operation of the given sources with
//!   reconstructed call URLs.
//! - `validate`: reports per-source structural diagnostics.
//! - `serve`: exposes the same operations over HTTP (feature `server`).

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod combine;
mod error;
mod fetch;
mod methods;
#[cfg(feature = "server")]
mod serve;
mod store;
mod validate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI merge & publish toolchain")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge the configured sources into one document and publish it.
    Combine(combine::CombineArgs),
    /// List every operation of the given sources.
    Methods(methods::MethodsArgs),
    /// Validate the given sources and print diagnostics.
    Validate(validate::ValidateArgs),
    /// Serve the merge and reporting operations over HTTP.
    #[cfg(feature = "server")]
    Serve(serve::ServeArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Combine(args) => combine::execute(args)?,
        Commands::Methods(args) => methods::execute(args)?,
        Commands::Validate(args) => validate::execute(args)?,
        #[cfg(feature = "server")]
        Commands::Serve(args) => serve::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
