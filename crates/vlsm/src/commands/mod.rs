//! Command dispatch: bridges CLI args -> core allocator -> output formatting.

pub mod allocate;
pub mod config_cmd;
pub mod inspect;
pub mod util;

use vlsm_config::Config;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::Settings;

/// Dispatch a parsed command to its handler.
pub fn dispatch(cmd: Command, cfg: &Config, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Allocate(args) => allocate::handle(args, cfg, settings),
        Command::Inspect(args) => inspect::handle(&args, settings),
        Command::Config(args) => config_cmd::handle(args, settings),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
