//! Merging source results into one audit outcome
//!
//! The aggregators run only after every contributing collector has resolved. They restore a
//! deterministic order by label, compute the aggregate score, evaluate the rule tables and
//! decide which single degradation note, if any, describes the run.

mod audit_result;
pub mod performance;
pub mod visual;

const LOG_TARGET: &str = " aggregate";

pub use audit_result::{AuditResult, ScoreSource, display_label, serialize_sources};
pub use performance::FALLBACK_NOTICE;
pub use visual::VisualAudit;
