//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Probador Media: evaluate media queries against simulated viewports
#[derive(Parser, Debug)]
#[command(name = "probador-media")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (results only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Result format
    #[arg(long, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate media queries against a viewport
    Eval(EvalArgs),

    /// Show which listeners a viewport change would notify
    Transition(TransitionArgs),

    /// List built-in device presets
    Devices(DevicesArgs),
}

/// Arguments for the eval command
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// Media queries to evaluate
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Viewport description file (YAML or JSON)
    #[arg(long, conflicts_with = "device")]
    pub viewport: Option<PathBuf>,

    /// Built-in device preset name (see `devices`); files go to `--viewport`
    #[arg(long)]
    pub device: Option<String>,

    /// Rotate the device preset to landscape
    #[arg(long, requires = "device")]
    pub landscape: bool,

    /// Feature override as `name=value` (repeatable)
    #[arg(short = 'F', long = "feature", value_name = "NAME=VALUE")]
    pub features: Vec<String>,
}

/// Arguments for the transition command
#[derive(Parser, Debug)]
pub struct TransitionArgs {
    /// Media queries to watch
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Starting viewport: a description file or a device preset name
    #[arg(long, value_name = "SRC")]
    pub from: String,

    /// Target viewport: a description file or a device preset name
    #[arg(long, value_name = "SRC")]
    pub to: String,
}

/// Arguments for the devices command
#[derive(Parser, Debug)]
pub struct DevicesArgs {
    /// Only list mobile devices
    #[arg(long)]
    pub mobile: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::config::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
