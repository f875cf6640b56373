//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Exemplar CLI - Transform and validate JSON documents by example
///
/// Specs are ordinary JSON or YAML documents whose strings may carry
/// backtick references into the data, and `$` commands that reshape or
/// check it.
#[derive(Parser, Debug)]
#[command(
    name = "exemplar",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "EXEMPLAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or the configured format]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reshape a data document into the form of a spec
    Transform(TransformArgs),

    /// Check a data document against a spec, filling in defaults
    Validate(ValidateArgs),

    /// Resolve the references of a spec against a store
    Inject(InjectArgs),

    /// Look up a dotted path in a store
    GetPath(GetPathArgs),

    /// Deep-merge documents, later ones winning
    Merge(MergeArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

/// Arguments for the transform command
#[derive(Parser, Debug)]
pub struct TransformArgs {
    /// Path to the data document (JSON or YAML)
    #[arg(short, long, value_name = "DATA")]
    pub data: PathBuf,

    /// Path to the spec document (JSON or YAML)
    #[arg(short, long, value_name = "SPEC")]
    pub spec: PathBuf,

    /// Extra store entries, merged under the data
    #[arg(short, long, value_name = "EXTRA")]
    pub extra: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the data document (JSON or YAML)
    #[arg(short, long, value_name = "DATA")]
    pub data: PathBuf,

    /// Path to the spec document (JSON or YAML)
    #[arg(short, long, value_name = "SPEC")]
    pub spec: PathBuf,

    /// Extra store entries
    #[arg(short, long, value_name = "EXTRA")]
    pub extra: Option<PathBuf>,

    /// Report errors without failing
    #[arg(long)]
    pub collect: bool,
}

/// Arguments for the inject command
#[derive(Parser, Debug)]
pub struct InjectArgs {
    /// Path to the spec document (JSON or YAML)
    #[arg(short, long, value_name = "SPEC")]
    pub spec: PathBuf,

    /// Path to the store document (JSON or YAML)
    #[arg(long, value_name = "STORE")]
    pub store: PathBuf,
}

/// Arguments for the get-path command
#[derive(Parser, Debug)]
pub struct GetPathArgs {
    /// Dotted path, e.g. `a.b.0`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Path to the store document (JSON or YAML)
    #[arg(long, value_name = "STORE")]
    pub store: PathBuf,
}

/// Arguments for the merge command
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Documents to merge, in order (JSON or YAML)
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Output format for the configuration
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration display formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

/// Output formats for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with status lines
    Human,
    /// Compact JSON
    Json,
    /// Indented JSON
    JsonPretty,
    /// YAML
    Yaml,
}

impl OutputFormat {
    /// Parse a configured format name
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
    }
}
