//! Command-line interface and orchestration for pagecheck
//!
//! This module parses the command line and drives the other modules end to end: collect
//! source results, aggregate them into an audit result, and write the reports.
//!
//! # Commands
//!
//! - **performance**: Query PageSpeed Insights for the mobile and desktop strategies, fall
//!   back to static inspection of the page's HTML when both fail, and report Core Web
//!   Vitals findings
//! - **visual**: Drive a browser through a WebDriver server across four viewports and
//!   report layout risks; exits with status 1 only when a browser was required but unavailable
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses the arguments with clap and routes to the command handler.
//! The audit commands share their setup through `common::Common`: logging, configuration,
//! URL normalization, the HTTP client and the progress spinner. Once the aggregate result
//! is ready, `Common::report` writes the markdown report and `SUMMARY.json` atomically and
//! prints a short summary.
//!
//! Configuration comes from an optional TOML file (`pagecheck.toml` by default) holding
//! endpoints, the inspection User-Agent and the browser settle delays.

mod common;
mod config;
mod host;
mod init;
mod performance;
mod progress_reporter;
mod run;
mod visual;

pub use common::normalize_url;
pub use config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_TOML};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use performance::{PerformanceArgs, process_performance};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use visual::{VisualArgs, process_visual};
