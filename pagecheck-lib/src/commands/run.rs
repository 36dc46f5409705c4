//! Command dispatch logic for pagecheck

use super::{InitArgs, PerformanceArgs, VisualArgs, init_config, process_performance, process_visual};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "pagecheck", version, author, long_about = None)]
#[command(about = "Audit the runtime health of a web page")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PagecheckSubcommand,
}

#[derive(Subcommand, Debug)]
enum PagecheckSubcommand {
    /// Measure load performance and report Core Web Vitals findings
    Performance(Box<PerformanceArgs>),
    /// Probe the page in a browser and report layout risks
    Visual(Box<VisualArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        PagecheckSubcommand::Performance(performance_args) => process_performance(host, performance_args).await,
        PagecheckSubcommand::Visual(visual_args) => process_visual(host, visual_args).await,
        PagecheckSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
