use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Which kind of source populated a [`MetricSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Provenance {
    /// Lab measurement from the primary performance API.
    PrimaryApi,

    /// Real-user field data only, without a lab run.
    FieldData,

    /// Structural signals from the static HTML of the page.
    StaticInspection,

    /// Measurements taken by evaluating probes in a real browser.
    BrowserProbe,
}

/// Which field-data block supplied [`FieldMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum FieldScope {
    /// Experience of the audited page itself.
    #[serde(rename = "loadingExperience")]
    #[strum(serialize = "loadingExperience")]
    Page,

    /// Experience aggregated over the whole origin.
    #[serde(rename = "originLoadingExperience")]
    #[strum(serialize = "originLoadingExperience")]
    Origin,
}

/// Lab timings from a single synthetic run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabMetrics {
    pub lcp_ms: Option<f64>,
    pub inp_ms: Option<f64>,
    pub cls: Option<f64>,
}

/// 75th percentile real-user metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetrics {
    pub scope: FieldScope,
    pub overall_category: Option<String>,
    pub lcp_ms: Option<f64>,
    pub inp_ms: Option<f64>,

    /// Always on the unitless 0..~1 scale.
    pub cls: Option<f64>,
}

impl FieldMetrics {
    /// True when no percentile was present in the block.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lcp_ms.is_none() && self.inp_ms.is_none() && self.cls.is_none()
    }
}

/// Structural counts gathered from the page source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuralSignals {
    pub final_url: Option<String>,
    pub html_bytes: Option<u64>,
    pub dom_node_estimate: Option<u64>,
    pub external_script_count: Option<u64>,
    pub sync_external_script_count: Option<u64>,
    pub third_party_script_count: Option<u64>,
    pub inline_script_bytes: Option<u64>,
    pub stylesheet_count: Option<u64>,
    pub preload_count: Option<u64>,
    pub images_total: Option<u64>,
    pub images_missing_dimensions: Option<u64>,
}

/// Overlap and overflow diagnostics captured at one viewport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewportDiagnostic {
    pub viewport: String,
    pub horizontal_scroll: Option<bool>,
    pub overlap_count: Option<u64>,
}

/// Layout and visual diagnostics gathered in a browser.
///
/// A single browser visit only fills in the fields it probes; the visual aggregator merges
/// the partial sets of all visits into one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualSignals {
    pub h1_visible_above_fold: Option<bool>,
    pub cta_visible_above_fold: Option<bool>,
    pub hero_media_visible_above_fold: Option<bool>,
    pub viewport_meta_present: Option<bool>,
    pub horizontal_scroll_mobile: Option<bool>,
    pub mobile_min_font_px: Option<f64>,
    pub mobile_touch_targets_total: Option<u64>,
    pub mobile_touch_targets_small: Option<u64>,
    pub desktop_overlap_count: Option<u64>,
    pub desktop_overflow_count: Option<u64>,
    pub layout_shift_count: Option<u64>,
    pub layout_shift_value: Option<f64>,
    pub responsive_breakpoint_failures: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub viewport_diagnostics: Vec<ViewportDiagnostic>,
}

impl VisualSignals {
    /// Fill every absent field of `self` from `other`.
    ///
    /// Values already present in `self` win, so merging in a fixed order is deterministic.
    pub fn merge_from(&mut self, other: &Self) {
        macro_rules! take_missing {
            ($($field:ident),* $(,)?) => {
                $(
                    if self.$field.is_none() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        take_missing!(
            h1_visible_above_fold,
            cta_visible_above_fold,
            hero_media_visible_above_fold,
            viewport_meta_present,
            horizontal_scroll_mobile,
            mobile_min_font_px,
            mobile_touch_targets_total,
            mobile_touch_targets_small,
            desktop_overlap_count,
            desktop_overflow_count,
            layout_shift_count,
            layout_shift_value,
            responsive_breakpoint_failures,
        );

        self.viewport_diagnostics.extend(other.viewport_diagnostics.iter().cloned());
    }

    /// Look up the sweep diagnostic captured for a viewport.
    #[must_use]
    pub fn diagnostic(&self, viewport: &str) -> Option<&ViewportDiagnostic> {
        self.viewport_diagnostics.iter().find(|d| d.viewport == viewport)
    }
}

/// Canonical, source-agnostic measurement bundle for one audit target and strategy.
///
/// Every field is either a validated value or explicitly absent. Nothing in here is a
/// sentinel standing in for "unknown".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSet {
    pub provenance: Provenance,

    /// Overall score on the 0..=100 scale, kept at full precision.
    pub score: Option<f64>,

    #[serde(flatten)]
    pub lab: LabMetrics,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldMetrics>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<StructuralSignals>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<VisualSignals>,
}

impl MetricSet {
    /// An empty set for the given provenance.
    #[must_use]
    pub const fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            score: None,
            lab: LabMetrics {
                lcp_ms: None,
                inp_ms: None,
                cls: None,
            },
            field: None,
            signals: None,
            visual: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_existing_values() {
        let mut base = VisualSignals {
            h1_visible_above_fold: Some(true),
            ..VisualSignals::default()
        };
        let other = VisualSignals {
            h1_visible_above_fold: Some(false),
            mobile_min_font_px: Some(12.0),
            ..VisualSignals::default()
        };

        base.merge_from(&other);

        assert_eq!(base.h1_visible_above_fold, Some(true));
        assert_eq!(base.mobile_min_font_px, Some(12.0));
    }

    #[test]
    fn test_merge_appends_diagnostics_in_order() {
        let mut base = VisualSignals::default();
        for viewport in ["desktop", "laptop"] {
            base.merge_from(&VisualSignals {
                viewport_diagnostics: vec![ViewportDiagnostic {
                    viewport: viewport.to_string(),
                    horizontal_scroll: Some(false),
                    overlap_count: Some(1),
                }],
                ..VisualSignals::default()
            });
        }

        assert_eq!(base.viewport_diagnostics.len(), 2);
        assert_eq!(base.viewport_diagnostics[1].viewport, "laptop");
        assert!(base.diagnostic("laptop").is_some());
        assert!(base.diagnostic("tablet").is_none());
    }

    #[test]
    fn test_field_metrics_is_empty() {
        let field = FieldMetrics {
            scope: FieldScope::Page,
            overall_category: Some("fast".into()),
            lcp_ms: None,
            inp_ms: None,
            cls: None,
        };
        assert!(field.is_empty());
    }

    #[test]
    fn test_provenance_serializes_camel_case() {
        let value = serde_json::to_value(Provenance::StaticInspection).unwrap();
        assert_eq!(value, "staticInspection");
        assert_eq!(Provenance::BrowserProbe.to_string(), "browserProbe");
    }

    #[test]
    fn test_metric_set_serialization_shape() {
        let mut set = MetricSet::new(Provenance::PrimaryApi);
        set.score = Some(65.0);
        set.lab.lcp_ms = Some(3200.0);

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["provenance"], "primaryApi");
        assert_eq!(value["score"], 65.0);
        assert_eq!(value["lcp_ms"], 3200.0);
        assert!(value["inp_ms"].is_null());
        assert!(value.get("field").is_none());
        assert!(value.get("signals").is_none());
    }
}
