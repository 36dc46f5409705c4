//! Report generation for audit results
//!
//! Every audit produces three artifacts from the same [`AuditReport`]:
//! - **Markdown**: the human-readable report, named after the pipeline that produced it
//! - **JSON**: the machine-readable `SUMMARY.json`
//! - **Console**: a short summary printed once both files are on disk
//!
//! Each generator writes into any [`core::fmt::Write`] so it can be tested against a
//! `String`. Files are placed with [`write_atomic`], which never leaves a partially
//! written artifact behind.
//!
//! Formatting helpers shared by the generators (missing values, timestamps, fixed
//! precision measurements) live in the `common` module.

mod audit_report;
mod common;
mod console;
mod json;
mod markdown;
mod writer;

pub use audit_report::{AuditReport, Pipeline, SUMMARY_FILE_NAME};
pub use console::generate as generate_console;
pub use json::generate as generate_json;
pub use markdown::generate as generate_markdown;
pub use writer::write_atomic;
