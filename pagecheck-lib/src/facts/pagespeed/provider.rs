use crate::facts::failure::{MAX_REASON_CHARS, SourceError, truncate_chars};
use crate::facts::{AuditTarget, SourceCollector, SourceResult};
use crate::metrics::{MetricSet, RawDocument, normalize};
use serde_json::Value;
use strum::{Display, IntoStaticStr};
use url::Url;

pub(super) const LOG_TARGET: &str = " pagespeed";

/// Name used when describing failures of this service to users.
pub const SERVICE_NAME: &str = "PageSpeed API";

/// Default PageSpeed Insights endpoint
pub const DEFAULT_PAGESPEED_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Device profile a measurement is taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    /// Both strategies, in reporting order.
    pub const ALL: [Self; 2] = [Self::Mobile, Self::Desktop];

    /// Capitalized name used in issue titles and report tables.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }
}

/// Collects lab and field metrics for one strategy from the PageSpeed Insights API.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    endpoint: Url,
    strategy: Strategy,
    api_key: Option<String>,
}

impl Provider {
    #[must_use]
    pub const fn new(client: reqwest::Client, endpoint: Url, strategy: Strategy, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint,
            strategy,
            api_key,
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    async fn fetch(&self, target: &AuditTarget) -> Result<MetricSet, SourceError> {
        let strategy: &'static str = self.strategy.into();
        let mut query = vec![("url", target.url.as_str()), ("strategy", strategy), ("category", "performance")];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }

        log::info!(target: LOG_TARGET, "Querying PageSpeed Insights ({strategy}) for {}", target.url);

        // without_url keeps the API key out of error text
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query)
            .timeout(target.timeout)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            log::debug!(target: LOG_TARGET, "Response body (first 500 chars): {}", body.chars().take(500).collect::<String>());
            return Err(SourceError::Protocol {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let doc: Value = serde_json::from_str(&body).map_err(|e| {
            log::debug!(target: LOG_TARGET, "Could not parse PageSpeed response ({strategy}): {e}");
            SourceError::MalformedResponse("Invalid JSON response".to_string())
        })?;

        let metrics = normalize(RawDocument::PageSpeed(&doc))?;

        log::debug!(
            target: LOG_TARGET,
            "PageSpeed ({strategy}): provenance={}, score={:?}, lcp={:?}, inp={:?}, cls={:?}, field={:?}",
            metrics.provenance,
            metrics.score,
            metrics.lab.lcp_ms,
            metrics.lab.inp_ms,
            metrics.lab.cls,
            metrics.field.as_ref().map(|f| f.scope),
        );

        Ok(metrics)
    }
}

impl SourceCollector for Provider {
    fn label(&self) -> &str {
        self.strategy.into()
    }

    async fn collect(&self, target: &AuditTarget) -> SourceResult {
        match self.fetch(target).await {
            Ok(metrics) => SourceResult::ok(metrics),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "PageSpeed ({}) failed: {e}", self.strategy);
                SourceResult::failed(SERVICE_NAME, &e)
            }
        }
    }
}

/// Best description of an error response: the API's own message, else the start of the body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(doc) = serde_json::from_str::<Value>(body) {
        return doc
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string);
    }

    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| truncate_chars(trimmed, MAX_REASON_CHARS))
}
