mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use daikin_core::Fleet;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never contact a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "daikin", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs at least one reachable device
        cmd => {
            let configs = config::resolve_devices(&cli.global)?;
            let fleet = Fleet::setup(configs).await;

            if fleet.is_empty() {
                return Err(unreachable_fleet(&fleet));
            }

            tracing::debug!(command = ?cmd, devices = fleet.len(), "dispatching command");
            commands::dispatch(cmd, &fleet, &cli.global).await
        }
    }
}

/// Error for a fleet in which no device survived setup.
fn unreachable_fleet(fleet: &Fleet) -> CliError {
    fleet
        .failures()
        .iter()
        .find_map(|failure| failure.error.clone())
        .map_or_else(
            || CliError::NoDevices {
                path: config::config_path().display().to_string(),
            },
            CliError::from,
        )
}
