//! The canonical metric model and the normalizers feeding it
//!
//! Every source, whatever its shape, ends up as a [`MetricSet`]: a flat bundle of optional,
//! validated values tagged with the [`Provenance`] of the source that produced it.
//!
//! # Implementation Model
//!
//! Raw documents are never trusted. JSON responses are read through the optional-path helpers
//! in `json_path`, where any break in a path simply yields an absent value. Only when the
//! whole document fails to look like what its source promises does [`normalize`] return a
//! [`NormalizationError`].
//!
//! Unit handling lives here and nowhere else:
//! - score fractions (0..=1) become 0..=100 at full precision,
//! - percentage-scaled layout-shift values are brought back onto the unitless scale,
//! - probe counts are accepted only as whole, non-negative numbers.
//!
//! HTML pages are not parsed; `html` runs a handful of pattern scans that yield structural
//! counts for the static inspection fallback.

mod html;
mod json_path;
mod metric_set;
mod normalize;
mod probe;

pub use html::HtmlDocument;
pub use metric_set::{
    FieldMetrics, FieldScope, LabMetrics, MetricSet, Provenance, StructuralSignals, ViewportDiagnostic, VisualSignals,
};
pub use normalize::{NormalizationError, RawDocument, fraction_to_percent, normalize, normalize_layout_shift, round_to};
