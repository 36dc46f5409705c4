//! Setup and report output shared between the performance and visual commands.

use super::config::Config;
use super::{Host, ProgressReporter};
use crate::Result;
use crate::facts::{AuditTarget, Progress};
use crate::reports::{AuditReport, SUMMARY_FILE_NAME, generate_console, generate_json, generate_markdown, write_atomic};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use std::io::Write;
use url::Url;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    fn enabled(self, is_terminal: impl FnOnce() -> bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared between the performance and visual commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Page to audit; `https://` is assumed when no scheme is given
    #[arg(long, value_name = "URL")]
    pub url: String,

    /// Timeout for each individual request, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Directory receiving the report, the JSON summary, and any screenshots
    #[arg(long, value_name = "PATH")]
    pub output_dir: Utf8PathBuf,

    /// Path to configuration file (default is `pagecheck.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// Turn user input into an absolute page URL, assuming `https://` when no scheme is given.
///
/// # Errors
///
/// Returns an error if the result is not a valid http(s) URL
pub fn normalize_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(app_err!("no URL given"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme).into_app_err_with(|| format!("'{raw}' is not a valid URL"))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(app_err!("'{raw}' has no host"));
    }

    Ok(url)
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    pub target: AuditTarget,
    pub client: reqwest::Client,
    pub progress: ProgressReporter,
    output_dir: Utf8PathBuf,
    host: &'a mut H,
    color: ColorMode,
}

impl<'a, H: Host> Common<'a, H> {
    /// Set up logging, configuration, the audit target and the shared HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the URL cannot be normalized,
    /// or the HTTP client cannot be created
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;

        if args.timeout == 0 {
            return Err(app_err!("timeout must be at least one second"));
        }

        let url = normalize_url(&args.url)?;
        let target = AuditTarget::new(url, Duration::from_secs(args.timeout));

        let client = reqwest::Client::builder().build().into_app_err("creating HTTP client")?;

        let delay = if args.log_level == LogLevel::None {
            Duration::from_millis(300)
        } else {
            Duration::from_hours(365 * 24)
        };

        let use_colors_for_progress = args.color.enabled(|| {
            use std::io::{IsTerminal, stderr};
            stderr().is_terminal()
        });

        Ok(Self {
            config,
            target,
            client,
            progress: ProgressReporter::new(delay, use_colors_for_progress),
            output_dir: args.output_dir.clone(),
            host,
            color: args.color,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        // a second command in the same process keeps the first logger
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Mutable access to the host, e.g. to set the exit status.
    pub fn host(&mut self) -> &mut H {
        self.host
    }

    /// Write the markdown report and the JSON summary, then print the console summary
    ///
    /// # Errors
    ///
    /// Returns an error if either artifact cannot be generated or written
    pub fn report(&mut self, report: &AuditReport<'_>) -> Result<()> {
        self.progress.done();

        let dir = self.output_dir.as_std_path();

        let mut markdown = String::new();
        generate_markdown(report, &mut markdown)?;
        let report_path = write_atomic(dir, report.markdown_file_name(), &markdown)?;

        let mut json = String::new();
        generate_json(report, &mut json)?;
        let summary_path = write_atomic(dir, SUMMARY_FILE_NAME, &json)?;

        let use_colors = self.color.enabled(|| {
            use std::io::{IsTerminal, stdout};
            stdout().is_terminal()
        });

        let mut console = String::new();
        generate_console(report, &report_path, &summary_path, use_colors, &mut console)?;
        let _ = write!(self.host.output(), "{console}");

        Ok(())
    }
}
