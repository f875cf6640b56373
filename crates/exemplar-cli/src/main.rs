//! Exemplar CLI - Command-line interface for by-example JSON transformation
//!
//! This is the main entry point for the Exemplar CLI application, providing
//! commands for transforming, validating, injecting and merging documents.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    // Configuration feeds logging, so it loads first; its failure is
    // reported once logging is up
    let config = Config::load_with_file(cli.config.as_deref());

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, &config));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli
        .output
        .or_else(|| OutputFormat::from_name(&config.output.format))
        .unwrap_or(OutputFormat::Human);
    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(format, use_color, cli.quiet, config.output.summary_length);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Transform(args) => handlers::handle_transform(args, config, &mut output),
        Commands::Validate(args) => handlers::handle_validate(args, config, &mut output),
        Commands::Inject(args) => handlers::handle_inject(args, config, &mut output),
        Commands::GetPath(args) => handlers::handle_get_path(args, config, &mut output),
        Commands::Merge(args) => handlers::handle_merge(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.apply_settings(&config.logging, verbosity);
    }

    // Environment wins over configuration
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
