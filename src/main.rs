use clap::Parser;
use std::process::ExitCode;
use tracing::{error, warn};

use profit_desk::cli::{execute, Cli};
use profit_desk::config::{AppConfig, ConfigSource};
use profit_desk::logging::init_logger;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, source) = match AppConfig::load(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let config = config.with_overrides(cli.db.clone(), cli.log_level.clone());
    init_logger(&config.log_level);

    if source == ConfigSource::Defaults {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let output = execute(cli.command, &config)
        .and_then(|value| Ok(serde_json::to_string_pretty(&value)?));
    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
