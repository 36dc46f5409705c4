use super::rule::{Rule, decimal, evaluate, rule};
use super::{Issue, Priority};
use crate::metrics::{MetricSet, round_to};

/// Largest Contentful Paint above this many milliseconds is poor.
pub const LCP_GOOD_MS: f64 = 2500.0;

/// Interaction to Next Paint above this many milliseconds is poor.
pub const INP_GOOD_MS: f64 = 200.0;

/// Cumulative Layout Shift above this is poor.
pub const CLS_GOOD: f64 = 0.1;

/// Mean scores below this are a high-priority finding.
pub const SCORE_LOW: f64 = 70.0;

/// Mean scores below this are a medium-priority finding.
pub const SCORE_NEEDS_IMPROVEMENT: f64 = 80.0;

/// Rules evaluated against each successful strategy's metrics, before prefixing with the strategy label.
pub static STRATEGY_RULES: &[Rule<MetricSet>] = &[
    rule!("lab_lcp", NoFinding, |m, absence| {
        absence.resolve(m.lab.lcp_ms).filter(|v| *v > LCP_GOOD_MS).map(|v| {
            Issue::new(
                Priority::High,
                "LCP exceeds good threshold",
                format!("LCP is {}ms (good <= 2500ms).", decimal(round_to(v, 1))),
                "Prioritize hero element delivery, reduce render-blocking resources, and preload LCP assets.",
            )
        })
    }),
    rule!("lab_inp", NoFinding, |m, absence| {
        absence.resolve(m.lab.inp_ms).filter(|v| *v > INP_GOOD_MS).map(|v| {
            Issue::new(
                Priority::High,
                "INP exceeds good threshold",
                format!("INP is {}ms (good <= 200ms).", decimal(round_to(v, 1))),
                "Break up long tasks, trim main-thread JavaScript, and defer non-critical handlers.",
            )
        })
    }),
    rule!("lab_cls", NoFinding, |m, absence| {
        absence.resolve(m.lab.cls).filter(|v| *v > CLS_GOOD).map(|v| {
            Issue::new(
                Priority::High,
                "CLS exceeds good threshold",
                format!("CLS is {} (good <= 0.1).", decimal(round_to(v, 3))),
                "Reserve layout space for media/embeds and stabilize font/layout shifts.",
            )
        })
    }),
    rule!("field_lcp", NoFinding, |m, absence| {
        absence
            .resolve(m.field.as_ref().and_then(|f| f.lcp_ms))
            .filter(|v| *v > LCP_GOOD_MS)
            .map(|v| {
                Issue::new(
                    Priority::High,
                    "field LCP p75 exceeds threshold",
                    format!("Field LCP p75 is {}ms (good <= 2500ms).", decimal(round_to(v, 1))),
                    "Improve TTFB and prioritize above-the-fold rendering for real-user sessions.",
                )
            })
    }),
    rule!("field_inp", NoFinding, |m, absence| {
        absence
            .resolve(m.field.as_ref().and_then(|f| f.inp_ms))
            .filter(|v| *v > INP_GOOD_MS)
            .map(|v| {
                Issue::new(
                    Priority::High,
                    "field INP p75 exceeds threshold",
                    format!("Field INP p75 is {}ms (good <= 200ms).", decimal(round_to(v, 1))),
                    "Reduce long tasks and defer non-critical JavaScript to improve interaction responsiveness.",
                )
            })
    }),
    rule!("field_cls", NoFinding, |m, absence| {
        absence
            .resolve(m.field.as_ref().and_then(|f| f.cls))
            .filter(|v| *v > CLS_GOOD)
            .map(|v| {
                Issue::new(
                    Priority::High,
                    "field CLS p75 exceeds threshold",
                    format!("Field CLS p75 is {} (good <= 0.1).", decimal(round_to(v, 3))),
                    "Reserve image/embed dimensions and stabilize dynamic content placement.",
                )
            })
    }),
];

/// Rules evaluated against the mean measured score, rounded to one decimal.
///
/// At most one of them fires.
pub static SCORE_RULES: &[Rule<f64>] = &[
    rule!("score_low", NoFinding, |score, _| {
        (*score < SCORE_LOW).then(|| {
            Issue::new(
                Priority::High,
                "Average Lighthouse performance score is low",
                format!("Average score is {}/100.", decimal(*score)),
                "Target critical-path CSS/JS reduction and improve cache hit rate for primary templates.",
            )
        })
    }),
    rule!("score_needs_improvement", NoFinding, |score, _| {
        (SCORE_LOW..SCORE_NEEDS_IMPROVEMENT).contains(score).then(|| {
            Issue::new(
                Priority::Medium,
                "Average Lighthouse performance score needs improvement",
                format!("Average score is {}/100.", decimal(*score)),
                "Address highest-impact audit opportunities on mobile first.",
            )
        })
    }),
];

/// Findings for one successful strategy, titled with `label` (e.g. "Mobile").
#[must_use]
pub fn strategy_issues(label: &str, metrics: &MetricSet) -> Vec<Issue> {
    evaluate(STRATEGY_RULES, metrics).into_iter().map(|issue| issue.for_subject(label)).collect()
}

/// Findings for the mean measured score.
#[must_use]
pub fn score_issues(mean_score: f64) -> Vec<Issue> {
    evaluate(SCORE_RULES, &round_to(mean_score, 1))
}

/// Low-priority finding for a strategy whose measurement failed unexpectedly.
#[must_use]
pub fn unavailable_issue(label: &str, reason: &str, credential_supplied: bool) -> Issue {
    let recommendation = if credential_supplied {
        "Check PageSpeed API key quota/billing and rerun this specialist."
    } else {
        "Optional: provide `PAGESPEED_API_KEY` to fetch live PageSpeed metrics."
    };

    Issue::new(Priority::Low, format!("{label} CWV API data unavailable"), reason, recommendation)
}

/// Low-priority finding for a failed fallback when no score is available at all.
#[must_use]
pub fn fallback_unavailable_issue(reason: &str) -> Issue {
    Issue::new(
        Priority::Low,
        "Fallback source inspection unavailable",
        reason,
        "Retry performance audit after confirming the page is reachable from this environment.",
    )
}
