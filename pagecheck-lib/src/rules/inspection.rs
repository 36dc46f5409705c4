use super::rule::{Rule, evaluate, rule};
use super::{Issue, Priority};
use crate::metrics::{StructuralSignals, round_to};

/// Starting point of the structural score estimate, before penalties.
pub const ESTIMATE_BASELINE: f64 = 82.0;

/// Lowest score the estimate can produce.
pub const ESTIMATE_MIN: f64 = 30.0;

/// Highest score the estimate can produce.
pub const ESTIMATE_MAX: f64 = 95.0;

/// Rules evaluated against the signals of a static inspection.
pub static INSPECTION_RULES: &[Rule<StructuralSignals>] = &[
    rule!("html_bytes", NoFinding, |s, absence| {
        absence.resolve(s.html_bytes).filter(|b| *b > 250_000).map(|b| {
            Issue::new(
                Priority::High,
                "Large HTML payload from source inspection",
                format!("Document size is {b} bytes, which can increase parse and hydration cost."),
                "Reduce inline payloads and move heavy JSON/script data to cacheable external assets.",
            )
        })
    }),
    rule!("sync_scripts", NoFinding, |s, absence| {
        absence.resolve(s.sync_external_script_count).filter(|n| *n >= 2).map(|n| {
            Issue::new(
                Priority::High,
                "Render-blocking script risk detected",
                format!("{n} external script tags appear without async/defer/module hints."),
                "Defer non-critical scripts and split route-specific bundles to reduce main-thread blocking.",
            )
        })
    }),
    rule!("external_scripts", NoFinding, |s, absence| {
        absence.resolve(s.external_script_count).filter(|n| *n >= 25).map(|n| {
            Issue::new(
                if n >= 35 { Priority::High } else { Priority::Medium },
                "High JavaScript request volume detected",
                format!("{n} external script references were found in source inspection."),
                "Audit bundle splitting and lazy-load below-the-fold features.",
            )
        })
    }),
    rule!("inline_script_bytes", NoFinding, |s, absence| {
        absence.resolve(s.inline_script_bytes).filter(|b| *b > 100_000).map(|b| {
            Issue::new(
                Priority::High,
                "Large inline script payload detected",
                format!("Inline script payload is approximately {b} bytes."),
                "Move large serialized data blocks to external JSON/script resources with caching.",
            )
        })
    }),
    rule!("dom_nodes", NoFinding, |s, absence| {
        absence.resolve(s.dom_node_estimate).filter(|n| *n > 1500).map(|n| {
            Issue::new(
                Priority::Medium,
                "Large DOM footprint risk",
                format!("Approximate DOM node count is {n}, which can increase interaction latency."),
                "Reduce deep DOM trees and simplify repeated component markup on key templates.",
            )
        })
    }),
    rule!("images_missing_dimensions", NoFinding, |s, absence| {
        absence.resolve(s.images_missing_dimensions).filter(|m| *m > 0).map(|m| {
            let total = s.images_total.unwrap_or_default().max(1);
            Issue::new(
                Priority::High,
                "Images missing explicit dimensions",
                format!("{m}/{total} images are missing width/height attributes, increasing CLS risk."),
                "Add explicit width/height or reserve aspect-ratio space for all critical images.",
            )
        })
    }),
    rule!("stylesheets", NoFinding, |s, absence| {
        absence.resolve(s.stylesheet_count).filter(|n| *n >= 3).map(|n| {
            Issue::new(
                Priority::Medium,
                "Multiple stylesheet requests detected",
                format!("{n} stylesheet links were detected in source inspection."),
                "Trim unused CSS and prioritize critical CSS for above-the-fold content.",
            )
        })
    }),
    rule!("third_party_scripts", NoFinding, |s, absence| {
        absence.resolve(s.third_party_script_count).filter(|n| *n >= 3).map(|n| {
            Issue::new(
                Priority::Medium,
                "Third-party script load pressure",
                format!("{n} third-party script references were found."),
                "Delay non-essential third-party scripts until after primary content is interactive.",
            )
        })
    }),
];

/// Findings for the signals of a static inspection.
#[must_use]
pub fn inspection_issues(signals: &StructuralSignals) -> Vec<Issue> {
    evaluate(INSPECTION_RULES, signals)
}

/// A substitute for the unmeasurable lab score, derived from structural signals alone.
///
/// Missing counts incur no penalty. The result is rounded to one decimal and always lies
/// within [`ESTIMATE_MIN`, `ESTIMATE_MAX`].
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
pub fn estimate_score(signals: &StructuralSignals) -> f64 {
    let html_bytes = signals.html_bytes.unwrap_or_default();
    let sync = signals.sync_external_script_count.unwrap_or_default();
    let external = signals.external_script_count.unwrap_or_default();
    let inline = signals.inline_script_bytes.unwrap_or_default();
    let dom = signals.dom_node_estimate.unwrap_or_default();
    let missing = signals.images_missing_dimensions.unwrap_or_default();
    let stylesheets = signals.stylesheet_count.unwrap_or_default();
    let third_party = signals.third_party_script_count.unwrap_or_default();

    let mut score = ESTIMATE_BASELINE;

    if html_bytes > 250_000 {
        score -= 10.0;
    } else if html_bytes > 150_000 {
        score -= 5.0;
    }

    score -= (sync as f64 * 4.0).min(12.0);

    if external > 35 {
        score -= 8.0;
    } else if external > 25 {
        score -= 5.0;
    }

    if inline > 120_000 {
        score -= 8.0;
    } else if inline > 70_000 {
        score -= 4.0;
    }

    if dom > 2500 {
        score -= 12.0;
    } else if dom > 1500 {
        score -= 8.0;
    }

    if missing > 0 {
        score -= (missing as f64 * 1.5).min(12.0);
    }

    if stylesheets >= 3 {
        score -= 4.0;
    }

    if third_party >= 3 {
        score -= 3.0;
    }

    round_to(score.clamp(ESTIMATE_MIN, ESTIMATE_MAX), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean() -> StructuralSignals {
        StructuralSignals {
            final_url: Some("https://example.com/".to_string()),
            html_bytes: Some(20_000),
            dom_node_estimate: Some(400),
            external_script_count: Some(4),
            sync_external_script_count: Some(0),
            third_party_script_count: Some(1),
            inline_script_bytes: Some(2_000),
            stylesheet_count: Some(1),
            preload_count: Some(2),
            images_total: Some(10),
            images_missing_dimensions: Some(0),
        }
    }

    #[test]
    fn test_clean_page() {
        assert!(inspection_issues(&clean()).is_empty());
        assert!((estimate_score(&clean()) - ESTIMATE_BASELINE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_script_heavy_page() {
        let signals = StructuralSignals {
            external_script_count: Some(40),
            sync_external_script_count: Some(3),
            images_total: Some(500),
            images_missing_dimensions: Some(500),
            ..clean()
        };

        let issues = inspection_issues(&signals);
        let titles: Vec<_> = issues.iter().map(Issue::title).collect();
        assert_eq!(
            titles,
            [
                "Render-blocking script risk detected",
                "High JavaScript request volume detected",
                "Images missing explicit dimensions",
            ]
        );
        assert!(issues.iter().all(|i| i.priority() == Priority::High));
        assert_eq!(
            issues[2].detail(),
            "500/500 images are missing width/height attributes, increasing CLS risk."
        );

        // 82 - 12 (sync) - 8 (external) - 12 (images)
        assert!((estimate_score(&signals) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_medium_script_volume() {
        let signals = StructuralSignals {
            external_script_count: Some(30),
            ..clean()
        };
        let issues = inspection_issues(&signals);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].priority(), Priority::Medium);
    }

    #[test]
    fn test_missing_dimensions_without_total() {
        let signals = StructuralSignals {
            images_total: None,
            images_missing_dimensions: Some(2),
            ..clean()
        };
        assert_eq!(
            inspection_issues(&signals)[0].detail(),
            "2/1 images are missing width/height attributes, increasing CLS risk."
        );
    }

    #[test]
    fn test_absent_signals_produce_nothing() {
        assert!(inspection_issues(&StructuralSignals::default()).is_empty());
        assert!((estimate_score(&StructuralSignals::default()) - ESTIMATE_BASELINE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_estimate_is_clamped() {
        let worst = StructuralSignals {
            html_bytes: Some(900_000),
            dom_node_estimate: Some(9_000),
            external_script_count: Some(90),
            sync_external_script_count: Some(30),
            third_party_script_count: Some(20),
            inline_script_bytes: Some(500_000),
            stylesheet_count: Some(12),
            images_total: Some(80),
            images_missing_dimensions: Some(80),
            ..clean()
        };
        assert!((estimate_score(&worst) - ESTIMATE_MIN).abs() < f64::EPSILON);
    }
}
