//! Command-line runner for the storefront end-to-end suite.
//!
//! ```bash
//! storefront run                      # every scenario, fresh Chromium
//! storefront run --tag smoke --headless
//! storefront list --tag cart
//! storefront config --json
//! ```

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, ListArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_config, render_scenario_list, ProgressReporter};
