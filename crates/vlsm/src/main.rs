mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vlsm_config::Config;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Settings;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
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

    // stdout carries command output; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Completions(args) = cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "vlsm", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = load_config();
    let settings = Settings::resolve(&cli.global, &cfg.defaults);

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &cfg, &settings)
}

/// Load the config file, falling back to defaults (with a warning) if it is unreadable.
fn load_config() -> Config {
    let path = vlsm_config::config_path();
    vlsm_config::load_config_from(&path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
        Config::default()
    })
}
