use super::html::{self, HtmlDocument};
use super::json_path::{dig, dig_non_empty_object, dig_non_negative, dig_str};
use super::probe;
use super::{FieldMetrics, FieldScope, LabMetrics, MetricSet, Provenance, VisualSignals};
use core::fmt::{Display, Formatter};
use serde_json::Value;

/// A raw response from one source, tagged with the kind of source that produced it.
#[derive(Debug, Clone, Copy)]
pub enum RawDocument<'a> {
    /// Body of a PageSpeed Insights `runPagespeed` response.
    PageSpeed(&'a Value),

    /// A fetched HTML page.
    Html(&'a HtmlDocument),

    /// Overlap probe result from one viewport sweep.
    ViewportSweep { viewport: &'a str, overlap: &'a Value },

    /// Probe results from the desktop signal visit.
    DesktopProbe {
        above_fold: &'a Value,
        overlap: &'a Value,
        layout_shift: &'a Value,
    },

    /// Probe result from the mobile signal visit.
    MobileProbe(&'a Value),
}

/// The document's overall structure is not what its source kind promises.
///
/// Missing individual fields are never reported through this; they simply come out as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    NotAnObject,
    UnexpectedShape(&'static str),
}

impl Display for NormalizationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "response document is not an object"),
            Self::UnexpectedShape(what) => write!(f, "unexpected shape: {what}"),
        }
    }
}

impl core::error::Error for NormalizationError {}

/// Convert a raw source response into the canonical metric model.
pub fn normalize(doc: RawDocument<'_>) -> Result<MetricSet, NormalizationError> {
    match doc {
        RawDocument::PageSpeed(value) => normalize_pagespeed(value),

        RawDocument::Html(page) => {
            let mut set = MetricSet::new(Provenance::StaticInspection);
            set.signals = Some(html::scan(page));
            Ok(set)
        }

        RawDocument::ViewportSweep { viewport, overlap } => {
            let diag = probe::viewport_diagnostic(viewport, overlap)?;
            Ok(browser_set(VisualSignals {
                viewport_diagnostics: vec![diag],
                ..VisualSignals::default()
            }))
        }

        RawDocument::DesktopProbe {
            above_fold,
            overlap,
            layout_shift,
        } => Ok(browser_set(probe::desktop_signals(above_fold, overlap, layout_shift)?)),

        RawDocument::MobileProbe(value) => Ok(browser_set(probe::mobile_signals(value)?)),
    }
}

fn browser_set(visual: VisualSignals) -> MetricSet {
    let mut set = MetricSet::new(Provenance::BrowserProbe);
    set.visual = Some(visual);
    set
}

fn normalize_pagespeed(doc: &Value) -> Result<MetricSet, NormalizationError> {
    if !doc.is_object() {
        return Err(NormalizationError::NotAnObject);
    }

    let lighthouse = dig(doc, &["lighthouseResult"]).filter(|v| v.is_object());
    let field = field_metrics(doc, FieldScope::Page).or_else(|| field_metrics(doc, FieldScope::Origin));

    let provenance = match (lighthouse, &field) {
        (Some(_), _) => Provenance::PrimaryApi,
        (None, Some(_)) => Provenance::FieldData,
        (None, None) => return Err(NormalizationError::UnexpectedShape("neither lighthouseResult nor field data present")),
    };

    let mut set = MetricSet::new(provenance);
    set.field = field;

    if let Some(lh) = lighthouse {
        set.score = dig_non_negative(lh, &["categories", "performance", "score"])
            .filter(|fraction| *fraction <= 1.0)
            .map(fraction_to_percent);

        set.lab = LabMetrics {
            lcp_ms: dig_non_negative(lh, &["audits", "largest-contentful-paint", "numericValue"]),
            inp_ms: dig_non_negative(lh, &["audits", "interaction-to-next-paint", "numericValue"]),
            cls: dig_non_negative(lh, &["audits", "cumulative-layout-shift", "numericValue"]),
        };
    }

    Ok(set)
}

/// Field block of the given scope, or `None` when it carries no usable percentile.
fn field_metrics(doc: &Value, scope: FieldScope) -> Option<FieldMetrics> {
    let key = match scope {
        FieldScope::Page => "loadingExperience",
        FieldScope::Origin => "originLoadingExperience",
    };

    let block = dig(doc, &[key])?;
    let metrics = Value::Object(dig_non_empty_object(block, &["metrics"])?.clone());

    let field = FieldMetrics {
        scope,
        overall_category: dig_str(block, &["overall_category"]).map(str::to_lowercase),
        lcp_ms: dig_non_negative(&metrics, &["LARGEST_CONTENTFUL_PAINT_MS", "percentile"]),
        inp_ms: dig_non_negative(&metrics, &["INTERACTION_TO_NEXT_PAINT", "percentile"]),
        cls: dig_non_negative(&metrics, &["CUMULATIVE_LAYOUT_SHIFT_SCORE", "percentile"]).map(normalize_layout_shift),
    };

    (!field.is_empty()).then_some(field)
}

/// Bring a layout-shift value onto the unitless scale.
///
/// Values above 1 are assumed to be percentages and divided by 100; anything else is already
/// unitless and passes through. The magnitude test is a guess about the upstream format, so a
/// genuine unitless value above 1 would be misread.
#[must_use]
pub fn normalize_layout_shift(value: f64) -> f64 {
    if value > 1.0 { value / 100.0 } else { value }
}

/// Convert a 0..=1 fraction to the 0..=100 scale without rounding.
#[must_use]
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Round to a fixed number of decimal places, for display.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
