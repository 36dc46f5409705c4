use crate::aggregate::{AuditResult, ScoreSource};
use crate::metrics::round_to;
use chrono::{DateTime, SecondsFormat, Utc};
use core::fmt::Display;

pub const NOT_AVAILABLE: &str = "n/a";

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format an optional measurement rounded to `places`, or `n/a`.
pub fn format_measure(value: Option<f64>, places: i32) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{:?}", round_to(v, places)))
}

/// Format any optional value, or `n/a`.
pub fn format_opt<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// The score as shown to people: one decimal, `n/a` when absent, marked when estimated.
pub fn format_score(result: &AuditResult) -> String {
    let score = format_measure(result.score, 1);
    if result.score_source == ScoreSource::Estimated {
        format!("{score}/100 (estimated from static inspection)")
    } else {
        format!("{score}/100")
    }
}
