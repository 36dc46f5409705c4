use super::{AuditResult, LOG_TARGET, ScoreSource};
use crate::facts::browser::{LAPTOP, MOBILE, TABLET, VisualRun, VisualStatus};
use crate::metrics::VisualSignals;
use crate::rules::{visit_failed_issue, visual_issues};
use std::path::PathBuf;

/// Overlap count from which a non-desktop sweep counts as a breakpoint failure.
pub const BREAKPOINT_OVERLAP_LIMIT: u64 = 6;

/// Outcome of the visual pipeline.
#[derive(Debug, Clone)]
pub struct VisualAudit {
    pub status: VisualStatus,
    pub reason: Option<String>,
    pub result: AuditResult,

    /// Merged signals of every successful visit.
    pub signals: VisualSignals,
    pub screenshots: Vec<PathBuf>,
}

/// Merge the browser visits into one [`VisualAudit`].
///
/// Signals are merged in visit order. Each failed visit adds one low-priority finding.
#[must_use]
pub fn aggregate(run: VisualRun) -> VisualAudit {
    let mut signals = VisualSignals::default();
    for (_, result) in &run.visits {
        if let Some(visual) = result.metrics().and_then(|m| m.visual.as_ref()) {
            signals.merge_from(visual);
        }
    }

    signals.responsive_breakpoint_failures = responsive_failures(&signals);

    let mut issues = visual_issues(&signals);
    for (label, result) in &run.visits {
        if !result.is_ok() {
            issues.push(visit_failed_issue(label, result.reason().unwrap_or("Browser visit failed.")));
        }
    }

    log::info!(target: LOG_TARGET, "Visual status {}, {} issues", run.status, issues.len());

    let result = AuditResult {
        score: None,
        score_source: ScoreSource::None,
        issues,
        note: run.reason.clone().unwrap_or_default(),
        sources: run.visits,
    };

    VisualAudit {
        status: run.status,
        reason: run.reason,
        result,
        signals,
        screenshots: run.screenshots,
    }
}

/// Count the non-desktop sweeps that showed horizontal scroll or heavy overlap.
///
/// `None` when none of those sweeps produced a diagnostic.
fn responsive_failures(signals: &VisualSignals) -> Option<u64> {
    let diagnostics: Vec<_> = [LAPTOP, TABLET, MOBILE]
        .iter()
        .filter_map(|viewport| signals.diagnostic(viewport.name))
        .collect();

    if diagnostics.is_empty() {
        return None;
    }

    let failing = diagnostics
        .iter()
        .filter(|d| d.horizontal_scroll == Some(true) || d.overlap_count.is_some_and(|n| n >= BREAKPOINT_OVERLAP_LIMIT))
        .count();

    u64::try_from(failing).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::browser::SERVICE_NAME;
    use crate::facts::{SourceError, SourceResult};
    use crate::metrics::{MetricSet, Provenance, ViewportDiagnostic};
    use crate::rules::Priority;

    fn sweep(viewport: &str, horizontal_scroll: bool, overlap_count: u64) -> (String, SourceResult) {
        let mut m = MetricSet::new(Provenance::BrowserProbe);
        m.visual = Some(VisualSignals {
            viewport_diagnostics: vec![ViewportDiagnostic {
                viewport: viewport.to_string(),
                horizontal_scroll: Some(horizontal_scroll),
                overlap_count: Some(overlap_count),
            }],
            ..VisualSignals::default()
        });
        (format!("sweep-{viewport}"), SourceResult::ok(m))
    }

    fn visit(label: &str, visual: VisualSignals) -> (String, SourceResult) {
        let mut m = MetricSet::new(Provenance::BrowserProbe);
        m.visual = Some(visual);
        (label.to_string(), SourceResult::ok(m))
    }

    fn run(status: VisualStatus, visits: Vec<(String, SourceResult)>) -> VisualRun {
        VisualRun {
            status,
            reason: None,
            visits,
            screenshots: Vec::new(),
        }
    }

    #[test]
    fn test_merges_visits_and_counts_breakpoints() {
        let audit = aggregate(run(
            VisualStatus::Ok,
            vec![
                sweep("desktop", true, 20),
                sweep("laptop", false, 6),
                sweep("tablet", true, 0),
                sweep("mobile", false, 1),
                visit(
                    "desktop",
                    VisualSignals {
                        h1_visible_above_fold: Some(true),
                        desktop_overlap_count: Some(4),
                        desktop_overflow_count: Some(0),
                        layout_shift_count: Some(0),
                        layout_shift_value: Some(0.0),
                        ..VisualSignals::default()
                    },
                ),
                visit(
                    "mobile",
                    VisualSignals {
                        viewport_meta_present: Some(true),
                        horizontal_scroll_mobile: Some(false),
                        mobile_min_font_px: Some(16.0),
                        ..VisualSignals::default()
                    },
                ),
            ],
        ));

        // desktop sweeps never count towards breakpoint failures
        assert_eq!(audit.signals.responsive_breakpoint_failures, Some(2));
        assert_eq!(audit.signals.viewport_diagnostics.len(), 4);
        assert_eq!(audit.signals.h1_visible_above_fold, Some(true));
        assert_eq!(audit.signals.viewport_meta_present, Some(true));

        let titles: Vec<_> = audit.result.issues.iter().map(|i| i.title().to_string()).collect();
        assert_eq!(titles, ["Potential desktop overlap risk", "Responsive breakpoint layout stress"]);
        assert_eq!(audit.result.score, None);
        assert_eq!(audit.result.sources.len(), 6);
    }

    #[test]
    fn test_failed_visit_adds_low_issue() {
        let failed = SourceResult::failed(SERVICE_NAME, &SourceError::Transport("HTTP 500: error: session not created".to_string()));
        let audit = aggregate(run(VisualStatus::Partial, vec![sweep("mobile", false, 0), ("mobile".to_string(), failed)]));

        assert_eq!(audit.result.issues.len(), 1);
        let issue = &audit.result.issues[0];
        assert_eq!(issue.priority(), Priority::Low);
        assert_eq!(issue.title(), "Browser visit 'mobile' failed");
        assert_eq!(issue.detail(), "HTTP 500 from Browser probe");
    }

    #[test]
    fn test_skipped_run_has_no_signals() {
        let audit = aggregate(VisualRun {
            status: VisualStatus::Skipped,
            reason: Some("Visual analysis disabled by mode=off.".to_string()),
            visits: Vec::new(),
            screenshots: Vec::new(),
        });

        assert!(audit.result.issues.is_empty());
        assert_eq!(audit.signals.responsive_breakpoint_failures, None);
        assert_eq!(audit.result.note, "Visual analysis disabled by mode=off.");
        assert_eq!(audit.status, VisualStatus::Skipped);
    }
}
