//! Config subcommand handlers.

use daikin_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("failed to render config: {e}"))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.devices
                    .iter()
                    .map(|d| d.address.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Add / remove devices ────────────────────────────────────
        ConfigCommand::AddDevice { address, name } => {
            let mut cfg = config::load_config()?;
            let added = cfg.add_device(&address, name)?;
            let path = config::save_config(&cfg)?;

            if !global.quiet {
                let verb = if added { "Added" } else { "Updated" };
                eprintln!("✓ {verb} {address} in {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::RemoveDevice { address } => {
            let mut cfg = config::load_config()?;
            if !cfg.remove_device(&address) {
                return Err(CliError::NotFound {
                    identifier: address,
                });
            }
            let path = config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("✓ Removed {address} from {}", path.display());
            }
            Ok(())
        }
    }
}
