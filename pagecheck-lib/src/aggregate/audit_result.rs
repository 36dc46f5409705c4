use crate::facts::SourceResult;
use crate::rules::{Issue, Priority};
use serde::{Serialize, Serializer};
use strum::{Display, IntoStaticStr};

/// Where the aggregate score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScoreSource {
    /// Mean of the scores reported by the measuring sources.
    Measured,

    /// Heuristic estimate derived from static inspection.
    Estimated,

    /// No score could be produced.
    None,
}

/// The outcome of one audit: a score, ordered findings, a degradation note and every source's raw result.
#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    /// Always within 0..=100 when present.
    pub score: Option<f64>,
    pub score_source: ScoreSource,

    /// In rule evaluation order, never re-sorted.
    pub issues: Vec<Issue>,

    /// Empty when nothing degraded.
    pub note: String,

    /// Keyed by label, in the order the caller fixed.
    #[serde(serialize_with = "serialize_sources")]
    pub sources: Vec<(String, SourceResult)>,
}

impl AuditResult {
    /// Number of issues at the given tier.
    #[must_use]
    pub fn count(&self, priority: Priority) -> usize {
        self.issues.iter().filter(|i| i.priority() == priority).count()
    }

    #[must_use]
    pub fn source(&self, label: &str) -> Option<&SourceResult> {
        self.sources.iter().find(|(l, _)| l == label).map(|(_, r)| r)
    }
}

/// Serialize labelled results as a map that keeps insertion order.
pub fn serialize_sources<S: Serializer>(sources: &[(String, SourceResult)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(sources.iter().map(|(label, result)| (label, result)))
}

/// Human form of a source label, e.g. `mobile` → `Mobile`.
#[must_use]
pub fn display_label(label: &str) -> String {
    let mut chars = label.chars();
    chars
        .next()
        .map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
