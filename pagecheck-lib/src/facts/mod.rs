//! Source collectors and the fallback coordinator
//!
//! This module gathers the raw quality signals for a page from several independent
//! collaborators of differing cost and reliability:
//! - **PageSpeed Insights**: lab and field measurements per strategy (mobile, desktop)
//! - **Static inspection**: structural counts taken from the page's HTML
//! - **Browser probing**: layout diagnostics measured in a real browser over WebDriver
//!
//! # Implementation Model
//!
//! Each collaborator is wrapped by one collector implementing [`SourceCollector`]. A
//! collector makes exactly one call and always resolves to a [`SourceResult`]: transport
//! failures, error statuses, unparsable bodies and unexpected shapes are all captured as a
//! [`SourceError`], classified into a [`FailureKind`] with a short human-readable reason, and
//! returned as an error-status result. Nothing propagates past a collector.
//!
//! The [`FallbackCoordinator`] runs the ranked primaries concurrently, and only when every
//! one of them failed does it try the single fallback. It records the states it went through
//! and which kind of source ended up supplying data.
//!
//! The browser side has its own gate: [`browser::Provider`] decides from the visual mode and
//! the availability of a WebDriver server whether any page is opened at all, and closes every
//! page it opens on all paths.

pub mod browser;
mod collector;
mod coordinator;
mod failure;
pub mod inspection;
pub mod pagespeed;
mod progress;
mod source_result;

pub use collector::{AuditTarget, DEFAULT_TIMEOUT, SourceCollector};
pub use coordinator::{CoordinatorOutcome, CoordinatorState, FallbackCoordinator, Supplier};
pub use failure::{Classified, FailureKind, MAX_REASON_CHARS, SourceError, classify, classify_text, truncate_chars};
pub use progress::{NoProgress, Progress};
pub use source_result::{SourceResult, SourceStatus};
