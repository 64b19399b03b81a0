//! Probador Media CLI Library
//!
//! Command-line front end for the Probar Media `matchMedia` mock: evaluate
//! queries against a viewport, preview which listeners a viewport change
//! notifies, and list device presets.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, DevicesArgs, EvalArgs, FormatArg, TransitionArgs};
pub use config::{CliConfig, ColorChoice, OutputFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{describe_viewport, Reporter};
