use crate::Result;
use crate::facts::browser::Settle;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pagecheck.toml";

/// Longest settle delay accepted, in milliseconds
const MAX_SETTLE_MS: u64 = 60_000;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// PageSpeed Insights endpoint
    #[serde(default = "default_pagespeed_endpoint")]
    pub pagespeed_endpoint: String,

    /// User-Agent for the static inspection fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// WebDriver server for browser probing
    #[serde(default)]
    pub webdriver_url: Option<String>,

    /// Delay after navigation before a viewport screenshot, in milliseconds
    #[serde(default = "default_navigation_settle_ms")]
    pub navigation_settle_ms: u64,

    /// Delay after navigation before the desktop signal probes, in milliseconds
    #[serde(default = "default_signal_settle_ms")]
    pub signal_settle_ms: u64,
}

fn default_pagespeed_endpoint() -> String {
    crate::facts::pagespeed::DEFAULT_PAGESPEED_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    crate::facts::inspection::DEFAULT_USER_AGENT.to_string()
}

const fn default_navigation_settle_ms() -> u64 {
    500
}

const fn default_signal_settle_ms() -> u64 {
    1200
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `pagecheck.toml` in `base_dir` is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("No {CONFIG_FILE_NAME} found in '{base_dir}', using defaults");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The PageSpeed endpoint as a URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not an http(s) URL
    pub fn pagespeed_endpoint(&self) -> Result<Url> {
        parse_http_url("pagespeed_endpoint", &self.pagespeed_endpoint)
    }

    #[must_use]
    pub const fn settle(&self) -> Settle {
        Settle {
            navigation: Duration::from_millis(self.navigation_settle_ms),
            signals: Duration::from_millis(self.signal_settle_ms),
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is malformed, the user agent is empty, or a delay is out of range
    fn validate(&self) -> Result<()> {
        let _ = self.pagespeed_endpoint()?;

        if let Some(webdriver_url) = &self.webdriver_url {
            let _ = parse_http_url("webdriver_url", webdriver_url)?;
        }

        if self.user_agent.trim().is_empty() {
            return Err(app_err!("user_agent must not be empty"));
        }

        for (name, value) in [
            ("navigation_settle_ms", self.navigation_settle_ms),
            ("signal_settle_ms", self.signal_settle_ms),
        ] {
            if value > MAX_SETTLE_MS {
                return Err(app_err!("{name} must be at most {MAX_SETTLE_MS}, got {value}"));
            }
        }

        Ok(())
    }
}

/// Parse `value` as an absolute http(s) URL, naming `setting` in the error.
pub fn parse_http_url(setting: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).into_app_err_with(|| format!("{setting} '{value}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(app_err!("{setting} '{value}' must use http or https"));
    }
    Ok(url)
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
