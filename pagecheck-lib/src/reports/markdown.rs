use super::common::{NOT_AVAILABLE, format_measure, format_opt, format_score, format_timestamp};
use super::{AuditReport, Pipeline};
use crate::Result;
use crate::aggregate::{AuditResult, VisualAudit, display_label};
use crate::facts::SourceResult;
use crate::facts::inspection::FALLBACK_LABEL;
use core::fmt::Write;

pub fn generate<W: Write>(report: &AuditReport<'_>, writer: &mut W) -> Result<()> {
    match report.pipeline {
        Pipeline::Performance(result) => generate_performance(report, result, writer),
        Pipeline::Visual(audit) => generate_visual(report, audit, writer),
    }
}

fn generate_performance<W: Write>(report: &AuditReport<'_>, result: &AuditResult, writer: &mut W) -> Result<()> {
    let strategies: Vec<_> = result.sources.iter().filter(|(label, _)| label != FALLBACK_LABEL).collect();

    writeln!(writer, "# Performance Audit Report")?;
    writeln!(writer)?;
    writeln!(writer, "- URL: `{}`", report.url)?;
    writeln!(writer, "- Generated: `{}`", format_timestamp(report.generated_at))?;
    writeln!(writer, "- Performance score: **{}**", format_score(result))?;

    if !result.note.is_empty() {
        writeln!(writer, "- PageSpeed note: {}", result.note)?;
    } else if strategies.iter().any(|(_, source)| !source.is_ok()) {
        writeln!(writer, "- PageSpeed note: live API data unavailable; fallback profiling used.")?;
    } else {
        writeln!(writer, "- PageSpeed note: live API data available.")?;
    }

    writeln!(writer)?;
    writeln!(writer, "## Core Web Vitals Snapshot")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "| Strategy | Status | Score | Lab LCP (ms) | Lab INP (ms) | Lab CLS | Field LCP p75 (ms) | Field INP p75 (ms) | Field CLS p75 | Field Source |"
    )?;
    writeln!(writer, "|---|---|---:|---:|---:|---:|---:|---:|---:|---|")?;
    for (label, source) in &strategies {
        write_strategy_row(writer, &display_label(label), source)?;
    }
    writeln!(writer)?;

    if let Some(fallback) = result.source(FALLBACK_LABEL) {
        write_inspection_snapshot(writer, fallback)?;
    }

    write_findings(writer, result, "- No significant performance risks detected from available data.")
}

fn write_strategy_row<W: Write>(writer: &mut W, label: &str, source: &SourceResult) -> Result<()> {
    let metrics = source.metrics();
    let lab = metrics.map(|m| &m.lab);
    let field = metrics.and_then(|m| m.field.as_ref());

    writeln!(
        writer,
        "| {label} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
        source.status(),
        format_measure(metrics.and_then(|m| m.score), 1),
        format_measure(lab.and_then(|l| l.lcp_ms), 1),
        format_measure(lab.and_then(|l| l.inp_ms), 1),
        format_measure(lab.and_then(|l| l.cls), 3),
        format_measure(field.and_then(|f| f.lcp_ms), 1),
        format_measure(field.and_then(|f| f.inp_ms), 1),
        format_measure(field.and_then(|f| f.cls), 3),
        format_opt(field.map(|f| f.scope)),
    )?;

    Ok(())
}

fn write_inspection_snapshot<W: Write>(writer: &mut W, fallback: &SourceResult) -> Result<()> {
    writeln!(writer, "## Source Inspection Snapshot")?;
    writeln!(writer)?;

    if let Some(signals) = fallback.metrics().and_then(|m| m.signals.as_ref()) {
        writeln!(writer, "| Signal | Value |")?;
        writeln!(writer, "|---|---:|")?;

        let rows = [
            ("HTML bytes", signals.html_bytes),
            ("DOM node estimate", signals.dom_node_estimate),
            ("External scripts", signals.external_script_count),
            ("Synchronous external scripts", signals.sync_external_script_count),
            ("Third-party scripts", signals.third_party_script_count),
            ("Inline script bytes", signals.inline_script_bytes),
            ("Stylesheets", signals.stylesheet_count),
            ("Images missing width/height", signals.images_missing_dimensions),
        ];
        for (name, value) in rows {
            writeln!(writer, "| {name} | {} |", format_opt(value))?;
        }
    } else {
        writeln!(writer, "- Fallback status: error ({})", fallback.reason().unwrap_or("unknown"))?;
    }

    writeln!(writer)?;
    Ok(())
}

fn generate_visual<W: Write>(report: &AuditReport<'_>, audit: &VisualAudit, writer: &mut W) -> Result<()> {
    let s = &audit.signals;

    writeln!(writer, "# Visual Audit Report")?;
    writeln!(writer)?;
    writeln!(writer, "- URL: `{}`", report.url)?;
    writeln!(writer, "- Generated: `{}`", format_timestamp(report.generated_at))?;
    writeln!(writer, "- Status: `{}`", audit.status)?;
    if let Some(reason) = &audit.reason {
        writeln!(writer, "- Reason: {reason}")?;
    }

    writeln!(writer)?;
    writeln!(writer, "## Signals")?;
    writeln!(writer)?;
    writeln!(writer, "- H1 visible above fold: {}", format_opt(s.h1_visible_above_fold))?;
    writeln!(writer, "- CTA visible above fold: {}", format_opt(s.cta_visible_above_fold))?;
    writeln!(writer, "- Hero media visible above fold: {}", format_opt(s.hero_media_visible_above_fold))?;
    writeln!(writer, "- Viewport meta present: {}", format_opt(s.viewport_meta_present))?;
    writeln!(writer, "- Horizontal scroll on mobile: {}", format_opt(s.horizontal_scroll_mobile))?;
    writeln!(
        writer,
        "- Touch targets <48px: {}/{}",
        format_opt(s.mobile_touch_targets_small),
        format_opt(s.mobile_touch_targets_total)
    )?;
    writeln!(writer, "- Minimum mobile font size: {}", format_opt(s.mobile_min_font_px))?;
    writeln!(writer, "- Desktop overlap signals: {}", format_opt(s.desktop_overlap_count))?;
    writeln!(writer, "- Desktop overflow signals: {}", format_opt(s.desktop_overflow_count))?;
    writeln!(
        writer,
        "- Layout shift events: {} (value={})",
        format_opt(s.layout_shift_count),
        format_measure(s.layout_shift_value, 4)
    )?;
    writeln!(writer, "- Responsive breakpoint failures: {}", format_opt(s.responsive_breakpoint_failures))?;
    writeln!(writer)?;

    write_findings(writer, &audit.result, "- No visual layout risks detected from available data.")?;

    writeln!(writer)?;
    writeln!(writer, "## Screenshots")?;
    writeln!(writer)?;
    if audit.screenshots.is_empty() {
        writeln!(writer, "- {NOT_AVAILABLE}")?;
    }
    for shot in &audit.screenshots {
        writeln!(writer, "- `{}`", shot.display())?;
    }

    Ok(())
}

fn write_findings<W: Write>(writer: &mut W, result: &AuditResult, when_empty: &str) -> Result<()> {
    writeln!(writer, "## Findings")?;
    writeln!(writer)?;

    if result.issues.is_empty() {
        writeln!(writer, "{when_empty}")?;
    }

    for issue in &result.issues {
        writeln!(writer, "- **{}**: {} - {}", issue.priority(), issue.title(), issue.detail())?;
        writeln!(writer, "  - Action: {}", issue.recommendation())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ScoreSource;
    use crate::facts::SourceError;
    use crate::facts::browser::VisualStatus;
    use crate::metrics::{FieldMetrics, FieldScope, MetricSet, Provenance, StructuralSignals, VisualSignals};
    use crate::rules::{Issue, Priority};
    use chrono::{DateTime, TimeZone, Utc};
    use std::path::PathBuf;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn mobile() -> SourceResult {
        let mut m = MetricSet::new(Provenance::PrimaryApi);
        m.score = Some(65.0);
        m.lab.lcp_ms = Some(3200.0);
        m.lab.inp_ms = Some(150.0);
        m.lab.cls = Some(0.05);
        m.field = Some(FieldMetrics {
            scope: FieldScope::Origin,
            overall_category: Some("average".to_string()),
            lcp_ms: Some(2400.0),
            inp_ms: None,
            cls: Some(0.02),
        });
        SourceResult::ok(m)
    }

    fn render(report: &AuditReport<'_>) -> String {
        let mut out = String::new();
        generate(report, &mut out).unwrap();
        out
    }

    #[test]
    fn test_performance_report() {
        let result = AuditResult {
            score: Some(77.5),
            score_source: ScoreSource::Measured,
            issues: vec![Issue::new(
                Priority::High,
                "Mobile LCP exceeds good threshold",
                "LCP is 3200.0ms (good <= 2500ms).",
                "Preload LCP assets.",
            )],
            note: String::new(),
            sources: vec![
                ("mobile".to_string(), mobile()),
                (
                    "desktop".to_string(),
                    SourceResult::failed("PageSpeed API", &SourceError::Transport("timed out".to_string())),
                ),
            ],
        };

        let text = render(&AuditReport::performance("https://example.com/", ts(), &result));

        assert!(text.starts_with("# Performance Audit Report\n\n- URL: `https://example.com/`\n"));
        assert!(text.contains("- Generated: `2024-01-15T10:30:00Z`\n"));
        assert!(text.contains("- Performance score: **77.5/100**\n"));
        assert!(text.contains("- PageSpeed note: live API data unavailable; fallback profiling used.\n"));
        assert!(text.contains("| Mobile | ok | 65.0 | 3200.0 | 150.0 | 0.05 | 2400.0 | n/a | 0.02 | originLoadingExperience |\n"));
        assert!(text.contains("| Desktop | error | n/a | n/a | n/a | n/a | n/a | n/a | n/a | n/a |\n"));
        assert!(!text.contains("Source Inspection Snapshot"));
        assert!(text.contains(
            "- **High**: Mobile LCP exceeds good threshold - LCP is 3200.0ms (good <= 2500ms).\n  - Action: Preload LCP assets.\n"
        ));
    }

    #[test]
    fn test_performance_report_with_fallback() {
        let mut inspected = MetricSet::new(Provenance::StaticInspection);
        inspected.signals = Some(StructuralSignals {
            html_bytes: Some(1234),
            external_script_count: Some(3),
            ..StructuralSignals::default()
        });

        let result = AuditResult {
            score: Some(82.0),
            score_source: ScoreSource::Estimated,
            issues: Vec::new(),
            note: "PageSpeed API quota exceeded".to_string(),
            sources: vec![("fallback".to_string(), SourceResult::ok(inspected))],
        };

        let text = render(&AuditReport::performance("https://example.com/", ts(), &result));

        assert!(text.contains("- Performance score: **82.0/100 (estimated from static inspection)**\n"));
        assert!(text.contains("- PageSpeed note: PageSpeed API quota exceeded\n"));
        assert!(text.contains("| HTML bytes | 1234 |\n"));
        assert!(text.contains("| DOM node estimate | n/a |\n"));
        assert!(text.contains("- No significant performance risks detected from available data.\n"));
    }

    #[test]
    fn test_failed_fallback_snapshot() {
        let result = AuditResult {
            score: None,
            score_source: ScoreSource::None,
            issues: Vec::new(),
            note: String::new(),
            sources: vec![(
                "fallback".to_string(),
                SourceResult::failed("Source inspection", &SourceError::Protocol { status: 503, message: None }),
            )],
        };

        let text = render(&AuditReport::performance("https://example.com/", ts(), &result));
        assert!(text.contains("- Performance score: **n/a/100**\n"));
        assert!(text.contains("- Fallback status: error (HTTP 503 from Source inspection)\n"));
    }

    #[test]
    fn test_visual_report() {
        let audit = VisualAudit {
            status: VisualStatus::Partial,
            reason: Some("1 of 6 browser visits failed".to_string()),
            result: AuditResult {
                score: None,
                score_source: ScoreSource::None,
                issues: Vec::new(),
                note: String::new(),
                sources: Vec::new(),
            },
            signals: VisualSignals {
                h1_visible_above_fold: Some(true),
                mobile_touch_targets_small: Some(3),
                mobile_touch_targets_total: Some(20),
                layout_shift_count: Some(2),
                layout_shift_value: Some(0.0123),
                ..VisualSignals::default()
            },
            screenshots: vec![PathBuf::from("out/screenshots/homepage-desktop.png")],
        };

        let text = render(&AuditReport::visual("https://example.com/", ts(), &audit));

        assert!(text.contains("- Status: `partial`\n- Reason: 1 of 6 browser visits failed\n"));
        assert!(text.contains("- H1 visible above fold: true\n"));
        assert!(text.contains("- CTA visible above fold: n/a\n"));
        assert!(text.contains("- Touch targets <48px: 3/20\n"));
        assert!(text.contains("- Layout shift events: 2 (value=0.0123)\n"));
        assert!(text.contains("- No visual layout risks detected from available data.\n"));
        assert!(text.ends_with("## Screenshots\n\n- `out/screenshots/homepage-desktop.png`\n"));
    }
}
