use crate::facts::failure::SourceError;
use crate::facts::{AuditTarget, SourceCollector, SourceResult};
use crate::metrics::{HtmlDocument, MetricSet, RawDocument, normalize};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

pub(super) const LOG_TARGET: &str = "inspection";

/// Name used when describing failures of this service to users.
pub const SERVICE_NAME: &str = "Source inspection";

/// Default User-Agent sent with the page fetch
pub const DEFAULT_USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; pagecheck/", env!("CARGO_PKG_VERSION"), ")");

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.8";

/// Label the static inspection result is reported under.
pub const FALLBACK_LABEL: &str = "fallback";

/// Fetches the page's HTML and derives structural signals from it.
#[derive(Debug, Clone)]
pub struct Provider {
    client: reqwest::Client,
    user_agent: String,
}

impl Provider {
    #[must_use]
    pub fn new(client: reqwest::Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    async fn fetch(&self, target: &AuditTarget) -> Result<MetricSet, SourceError> {
        log::info!(target: LOG_TARGET, "Fetching page source of {}", target.url);

        let response = self
            .client
            .get(target.url.clone())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .timeout(target.timeout)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Protocol {
                status: status.as_u16(),
                message: status.canonical_reason().map(ToString::to_string),
            });
        }

        let final_url = response.url().clone();
        let bytes = response.bytes().await.map_err(|e| SourceError::Transport(e.to_string()))?;

        let page = HtmlDocument {
            text: String::from_utf8_lossy(&bytes).into_owned(),
            byte_len: bytes.len() as u64,
            final_url,
        };

        let metrics = normalize(RawDocument::Html(&page))?;

        if let Some(signals) = &metrics.signals {
            log::debug!(target: LOG_TARGET, "Source signals for {}: {signals:?}", page.final_url);
        }

        Ok(metrics)
    }
}

impl SourceCollector for Provider {
    fn label(&self) -> &str {
        FALLBACK_LABEL
    }

    async fn collect(&self, target: &AuditTarget) -> SourceResult {
        match self.fetch(target).await {
            Ok(metrics) => SourceResult::ok(metrics),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not inspect the source of {}: {e}", target.url);
                SourceResult::failed(SERVICE_NAME, &e)
            }
        }
    }
}
