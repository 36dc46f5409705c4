#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for pagecheck
//!
//! This library holds all functionality for the pagecheck tool, which audits a web page's
//! load performance and layout integrity and turns the measurements into a prioritized list
//! of findings.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Source collectors and the fallback coordinator
//! - [`metrics`]: The canonical metric model and the normalizers feeding it
//! - [`rules`]: Threshold rules turning metrics into issues
//! - [`aggregate`]: Merging of per-source results into one audit result
//! - [`reports`]: Markdown, JSON, and console output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod aggregate;
pub mod commands;
pub mod facts;
pub mod metrics;
pub mod reports;
pub mod rules;

pub use crate::commands::{Host, run};
