use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::aggregate::performance::aggregate;
use crate::facts::{FallbackCoordinator, inspection, pagespeed};
use crate::reports::AuditReport;
use chrono::Utc;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct PerformanceArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// PageSpeed Insights API key; without one the API is used anonymously
    #[arg(long, value_name = "KEY", env = "PAGESPEED_API_KEY", hide_env_values = true)]
    pub pagespeed_key: Option<String>,
}

impl PerformanceArgs {
    /// The API key, if one with any content was given.
    fn api_key(&self) -> Option<String> {
        self.pagespeed_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToString::to_string)
    }
}

pub async fn process_performance<H: Host>(host: &mut H, args: &PerformanceArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let api_key = args.api_key();
    let endpoint = common.config.pagespeed_endpoint()?;

    log::info!(
        "Auditing performance of {} ({})",
        common.target.url,
        if api_key.is_some() { "with API key" } else { "anonymous" }
    );

    let primaries: Vec<_> = pagespeed::Strategy::ALL
        .into_iter()
        .map(|strategy| pagespeed::Provider::new(common.client.clone(), endpoint.clone(), strategy, api_key.clone()))
        .collect();
    let fallback = inspection::Provider::new(common.client.clone(), common.config.user_agent.clone());

    let outcome = FallbackCoordinator::new(&primaries, &fallback)
        .run(&common.target, &common.progress)
        .await;

    let result = aggregate(&outcome, api_key.is_some());
    let url = common.target.url.to_string();
    common.report(&AuditReport::performance(&url, Utc::now(), &result))
}
