use super::{AuditResult, LOG_TARGET, ScoreSource, display_label};
use crate::facts::CoordinatorOutcome;
use crate::metrics::round_to;
use crate::rules::{estimate_score, fallback_unavailable_issue, inspection_issues, score_issues, strategy_issues, unavailable_issue};

/// Degradation note used whenever static inspection findings stand in for measurements.
pub const FALLBACK_NOTICE: &str = "PageSpeed API unavailable; source-code fallback profiling used.";

/// Reason substituted when a failed source carries none.
const UNKNOWN_FAILURE: &str = "Unable to fetch PageSpeed data.";

/// Merge everything the coordinator gathered into one [`AuditResult`].
///
/// `credential_supplied` decides whether credential and quota failures are an expected
/// degradation (a note) or a finding.
#[must_use]
pub fn aggregate(outcome: &CoordinatorOutcome, credential_supplied: bool) -> AuditResult {
    let mut issues = Vec::new();
    let mut expected_reasons = Vec::new();

    let scores: Vec<f64> = outcome
        .primaries
        .iter()
        .filter_map(|(_, result)| result.metrics().and_then(|m| m.score))
        .collect();

    #[expect(clippy::cast_precision_loss, reason = "a handful of strategies")]
    let mean = (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

    for (label, result) in &outcome.primaries {
        let label = display_label(label);

        if let Some(metrics) = result.metrics() {
            issues.extend(strategy_issues(&label, metrics));
            continue;
        }

        let reason = result.reason().unwrap_or(UNKNOWN_FAILURE);
        if result.failure_kind().is_some_and(|kind| kind.is_expected_unavailable(credential_supplied)) {
            log::debug!(target: LOG_TARGET, "{label} unavailable as expected: {reason}");
            expected_reasons.push(reason.to_string());
        } else {
            issues.push(unavailable_issue(&label, reason, credential_supplied));
        }
    }

    if let Some(mean) = mean {
        issues.extend(score_issues(mean));
    }

    let (mut score, mut score_source) = mean.map_or((None, ScoreSource::None), |m| (Some(m), ScoreSource::Measured));
    let mut fallback_used = false;

    if let Some((_, fallback)) = &outcome.fallback {
        let signals = fallback.metrics().and_then(|m| m.signals.as_ref());

        if let Some(signals) = signals {
            if score.is_none() {
                score = Some(estimate_score(signals));
                score_source = ScoreSource::Estimated;
            }

            let fallback_issues = inspection_issues(signals);
            if !fallback_issues.is_empty() && outcome.any_primary_failed() {
                issues.extend(fallback_issues);
                fallback_used = true;
            }
        } else if !fallback.is_ok() && score.is_none() {
            issues.push(fallback_unavailable_issue(
                fallback.reason().unwrap_or("Fallback source inspection failed."),
            ));
        }
    }

    let note = if fallback_used {
        FALLBACK_NOTICE.to_string()
    } else {
        expected_reasons.into_iter().next().unwrap_or_default()
    };

    log::info!(
        target: LOG_TARGET,
        "Performance score {} ({score_source}), {} issues",
        score.map_or_else(|| "n/a".to_string(), |s| round_to(s, 1).to_string()),
        issues.len()
    );

    AuditResult {
        score,
        score_source,
        issues,
        note,
        sources: outcome.sources().cloned().collect(),
    }
}
