use crate::aggregate::{AuditResult, VisualAudit};
use chrono::{DateTime, Utc};

/// Which pipeline produced a report.
#[derive(Debug, Clone, Copy)]
pub enum Pipeline<'a> {
    Performance(&'a AuditResult),
    Visual(&'a VisualAudit),
}

/// Everything a report generator needs about one audit run.
#[derive(Debug, Clone, Copy)]
pub struct AuditReport<'a> {
    pub url: &'a str,
    pub generated_at: DateTime<Utc>,
    pub pipeline: Pipeline<'a>,
}

impl<'a> AuditReport<'a> {
    #[must_use]
    pub const fn performance(url: &'a str, generated_at: DateTime<Utc>, result: &'a AuditResult) -> Self {
        Self {
            url,
            generated_at,
            pipeline: Pipeline::Performance(result),
        }
    }

    #[must_use]
    pub const fn visual(url: &'a str, generated_at: DateTime<Utc>, audit: &'a VisualAudit) -> Self {
        Self {
            url,
            generated_at,
            pipeline: Pipeline::Visual(audit),
        }
    }

    #[must_use]
    pub const fn result(&self) -> &'a AuditResult {
        match self.pipeline {
            Pipeline::Performance(result) => result,
            Pipeline::Visual(audit) => &audit.result,
        }
    }

    /// File name of the markdown report for this pipeline.
    #[must_use]
    pub const fn markdown_file_name(&self) -> &'static str {
        match self.pipeline {
            Pipeline::Performance(_) => "PERFORMANCE-AUDIT-REPORT.md",
            Pipeline::Visual(_) => "VISUAL-AUDIT-REPORT.md",
        }
    }
}

/// File name of the JSON summary, shared by both pipelines.
pub const SUMMARY_FILE_NAME: &str = "SUMMARY.json";
