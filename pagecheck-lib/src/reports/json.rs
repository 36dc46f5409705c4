use super::common::format_timestamp;
use super::{AuditReport, Pipeline};
use crate::Result;
use crate::aggregate::{ScoreSource, serialize_sources};
use crate::facts::SourceResult;
use crate::metrics::VisualSignals;
use crate::rules::{Issue, Priority};
use core::fmt::Write;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

#[derive(Serialize)]
struct Summary<'a> {
    url: &'a str,
    generated_at: String,
    pipeline: &'static str,
    status: String,
    score: Option<f64>,
    score_source: ScoreSource,
    note: &'a str,
    #[serde(serialize_with = "sources")]
    sources: &'a [(String, SourceResult)],
    issues_count: usize,
    priority_counts: PriorityCounts,
    issues: &'a [Issue],
    #[serde(flatten)]
    visual: Option<VisualExtras<'a>>,
}

#[derive(Serialize)]
struct PriorityCounts {
    #[serde(rename = "High")]
    high: usize,
    #[serde(rename = "Medium")]
    medium: usize,
    #[serde(rename = "Low")]
    low: usize,
}

#[derive(Serialize)]
struct VisualExtras<'a> {
    reason: Option<&'a str>,
    screenshots: &'a [PathBuf],
    signals: &'a VisualSignals,
}

fn sources<S: Serializer>(sources: &&[(String, SourceResult)], serializer: S) -> Result<S::Ok, S::Error> {
    serialize_sources(sources, serializer)
}

pub fn generate<W: Write>(report: &AuditReport<'_>, writer: &mut W) -> Result<()> {
    let result = report.result();

    let (pipeline, status, visual) = match report.pipeline {
        Pipeline::Performance(_) => ("performance", "ok".to_string(), None),
        Pipeline::Visual(audit) => (
            "visual",
            audit.status.to_string(),
            Some(VisualExtras {
                reason: audit.reason.as_deref(),
                screenshots: &audit.screenshots,
                signals: &audit.signals,
            }),
        ),
    };

    let summary = Summary {
        url: report.url,
        generated_at: format_timestamp(report.generated_at),
        pipeline,
        status,
        score: result.score,
        score_source: result.score_source,
        note: &result.note,
        sources: &result.sources,
        issues_count: result.issues.len(),
        priority_counts: PriorityCounts {
            high: result.count(Priority::High),
            medium: result.count(Priority::Medium),
            low: result.count(Priority::Low),
        },
        issues: &result.issues,
        visual,
    };

    writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}
