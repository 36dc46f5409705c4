//! Threshold rules that turn metrics into prioritized findings
//!
//! Every rule is a pure function from one subject (a strategy's [`MetricSet`](crate::metrics::MetricSet),
//! the mean score, a static inspection's signals, or the merged browser signals) to zero or one
//! [`Issue`]. Rules live in fixed, ordered tables and are evaluated in table order, so the same
//! input always yields the same issues in the same order.
//!
//! Each rule states its own [`Absence`] policy. Most rules treat an absent value as "nothing to
//! report"; none of them silently coerce missing data into a finding.

mod inspection;
mod issue;
mod performance;
mod rule;
mod visual;

pub use inspection::{ESTIMATE_BASELINE, ESTIMATE_MAX, ESTIMATE_MIN, INSPECTION_RULES, estimate_score, inspection_issues};
pub use issue::{Issue, Priority};
pub use performance::{
    CLS_GOOD, INP_GOOD_MS, LCP_GOOD_MS, SCORE_LOW, SCORE_NEEDS_IMPROVEMENT, SCORE_RULES, STRATEGY_RULES, fallback_unavailable_issue,
    score_issues, strategy_issues, unavailable_issue,
};
pub use rule::{Absence, Rule, evaluate};
pub use visual::{MIN_FONT_PX, VISUAL_RULES, visit_failed_issue, visual_issues};
