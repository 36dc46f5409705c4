use super::failure::{FailureKind, SourceError, classify};
use crate::metrics::MetricSet;
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceStatus {
    Ok,
    Error,
}

/// Outcome of a single collector invocation.
///
/// Metrics are present exactly when the status is `ok`; a reason, its raw text and its
/// failure kind are present exactly when it is `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceResult {
    status: SourceStatus,
    reason: Option<String>,
    reason_raw: Option<String>,
    failure_kind: Option<FailureKind>,
    metrics: Option<MetricSet>,
}

impl SourceResult {
    #[must_use]
    pub const fn ok(metrics: MetricSet) -> Self {
        Self {
            status: SourceStatus::Ok,
            reason: None,
            reason_raw: None,
            failure_kind: None,
            metrics: Some(metrics),
        }
    }

    /// A failed result whose reason has been classified for `service`.
    #[must_use]
    pub fn failed(service: &str, error: &SourceError) -> Self {
        let classified = classify(service, error);
        Self {
            status: SourceStatus::Error,
            reason: Some(classified.reason),
            reason_raw: Some(error.raw_reason()),
            failure_kind: Some(classified.kind),
            metrics: None,
        }
    }

    #[must_use]
    pub const fn status(&self) -> SourceStatus {
        self.status
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.status, SourceStatus::Ok)
    }

    #[must_use]
    pub const fn metrics(&self) -> Option<&MetricSet> {
        self.metrics.as_ref()
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    #[must_use]
    pub fn reason_raw(&self) -> Option<&str> {
        self.reason_raw.as_deref()
    }

    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        self.failure_kind
    }
}
