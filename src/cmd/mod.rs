//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to [`run`] or
//! [`validate`]. Each handler lives in its own submodule.

pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::BounceError;

pub async fn dispatch(cli: Cli) -> Result<(), BounceError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  bounce v{version} \u{2014} HTTP reverse proxy\n\n  \
         No command provided. To get started:\n\n    \
         bounce run                   Start the proxy (auto-detects ./bounce.yaml)\n    \
         bounce run -c routes.json    Start with a specific config file\n    \
         bounce --help                See all commands and options\n"
    );
}
