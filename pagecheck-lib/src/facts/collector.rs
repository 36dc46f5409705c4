use super::SourceResult;
use core::time::Duration;
use url::Url;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The page being audited, plus the per-call limits every collector honours.
#[derive(Debug, Clone)]
pub struct AuditTarget {
    pub url: Url,
    pub timeout: Duration,
}

impl AuditTarget {
    #[must_use]
    pub const fn new(url: Url, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

/// Wraps exactly one external collaborator.
///
/// A collector never fails: every transport, protocol, or shape problem is turned into an
/// error-status [`SourceResult`] before `collect` returns.
pub trait SourceCollector: Send + Sync {
    /// Label the result is reported under (e.g. "mobile", "fallback").
    fn label(&self) -> &str;

    /// Make the one call this collector wraps.
    fn collect(&self, target: &AuditTarget) -> impl Future<Output = SourceResult> + Send;
}
