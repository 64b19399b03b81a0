//! Probador Media CLI: evaluate media queries against simulated viewports
//!
//! ## Usage
//!
//! ```bash
//! probador-media eval "(max-width: 600px)" --device "iPhone 14"
//! probador-media eval "(prefers-color-scheme: dark)" -F prefers-color-scheme=dark
//! probador-media transition "(max-width: 600px)" --from "iPhone 14" --to desktop.yaml
//! probador-media devices --format json
//! ```

use clap::Parser;
use probador_media::{
    handlers::{execute_devices, execute_eval, execute_transition},
    Cli, CliConfig, CliResult, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    let reporter = Reporter::new(&config);
    match cli.command {
        Commands::Eval(args) => reporter.eval(&execute_eval(&args)?),
        Commands::Transition(args) => reporter.transition(&execute_transition(&args)?),
        Commands::Devices(args) => reporter.devices(&execute_devices(&args)),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(cli.color.into())
        .with_format(cli.format.into())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
