//! Command dispatch: bridges CLI args -> device controllers -> output formatting.

pub mod config_cmd;
pub mod info;
pub mod set;
pub mod status;

use daikin_core::Fleet;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => {
            status::handle(fleet, global);
            Ok(())
        }
        Command::Info => {
            info::handle(fleet, global);
            Ok(())
        }
        Command::Set(args) => set::handle(fleet, args, global).await,
        // Config and Completions are handled before any device is set up
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
