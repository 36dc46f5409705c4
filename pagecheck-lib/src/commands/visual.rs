use super::Host;
use super::common::{Common, CommonArgs};
use super::config::parse_http_url;
use crate::Result;
use crate::aggregate::visual::aggregate;
use crate::facts::browser::{Provider, VisualMode, VisualStatus, WebDriver};
use crate::reports::AuditReport;
use chrono::Utc;
use clap::Parser;

/// Subdirectory of the output directory receiving viewport screenshots
const SCREENSHOT_DIR: &str = "screenshots";

#[derive(Parser, Debug)]
pub struct VisualArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Whether to drive a browser: `on` requires one, `auto` uses one when reachable
    #[arg(long, value_name = "MODE", default_value = "auto")]
    pub visual: VisualMode,

    /// W3C WebDriver server to drive the browser through, overriding the configuration file
    #[arg(long, value_name = "URL", env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,
}

pub async fn process_visual<H: Host>(host: &mut H, args: &VisualArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    let endpoint = args
        .webdriver_url
        .as_deref()
        .or(common.config.webdriver_url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| parse_http_url("webdriver_url", url))
        .transpose()?;

    log::info!(
        "Auditing layout of {} (mode {}, WebDriver {})",
        common.target.url,
        args.visual,
        endpoint.as_ref().map_or("not configured", url::Url::as_str)
    );

    let driver = endpoint.map(|url| WebDriver::new(common.client.clone(), &url, common.target.timeout));
    let provider = Provider::new(
        driver,
        args.visual,
        common.output_dir().join(SCREENSHOT_DIR),
        common.config.settle(),
    );

    let run = provider.run(&common.target, &common.progress).await;
    let audit = aggregate(run);

    let url = common.target.url.to_string();
    common.report(&AuditReport::visual(&url, Utc::now(), &audit))?;

    if audit.status == VisualStatus::Failed {
        common.host().exit(1);
    }

    Ok(())
}
