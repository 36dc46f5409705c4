use super::common::format_score;
use super::{AuditReport, Pipeline};
use crate::Result;
use crate::facts::browser::VisualStatus;
use crate::rules::Priority;
use core::fmt::Write;
use owo_colors::OwoColorize;
use std::path::Path;
use strum::IntoEnumIterator;

/// Short run summary for the terminal, pointing at the written artifacts.
pub fn generate<W: Write>(report: &AuditReport<'_>, report_path: &Path, summary_path: &Path, use_colors: bool, writer: &mut W) -> Result<()> {
    let result = report.result();

    writeln!(writer, "URL: {}", report.url)?;

    match report.pipeline {
        Pipeline::Performance(result) => {
            let score = format_score(result);
            if use_colors {
                writeln!(writer, "Performance score: {}", score.bold())?;
            } else {
                writeln!(writer, "Performance score: {score}")?;
            }
        }
        Pipeline::Visual(audit) => {
            let status = audit.status.to_string();
            let colored_status = if use_colors {
                match audit.status {
                    VisualStatus::Ok => status.green().bold().to_string(),
                    VisualStatus::Partial | VisualStatus::Skipped => status.yellow().bold().to_string(),
                    VisualStatus::Failed => status.red().bold().to_string(),
                }
            } else {
                status
            };
            writeln!(writer, "Visual status: {colored_status}")?;
        }
    }

    write!(writer, "Issues: {}", result.issues.len())?;
    if !result.issues.is_empty() {
        let counts: Vec<_> = Priority::iter()
            .map(|p| (p, result.count(p)))
            .filter(|(_, n)| *n > 0)
            .map(|(p, n)| {
                let text = format!("{n} {p}");
                if !use_colors {
                    return text;
                }
                match p {
                    Priority::High => text.red().to_string(),
                    Priority::Medium => text.yellow().to_string(),
                    Priority::Low => text.dimmed().to_string(),
                }
            })
            .collect();
        write!(writer, " ({})", counts.join(", "))?;
    }
    writeln!(writer)?;

    writeln!(writer, "Report: {}", report_path.display())?;
    writeln!(writer, "Summary: {}", summary_path.display())?;
    Ok(())
}
