//! Conversion of in-page probe results into visual signals.

use super::json_path::{dig, dig_bool, dig_non_negative, dig_u64};
use super::normalize::{NormalizationError, round_to};
use super::{ViewportDiagnostic, VisualSignals};
use serde_json::Value;

/// Result of the overlap/overflow probe at one viewport.
pub fn viewport_diagnostic(viewport: &str, overlap: &Value) -> Result<ViewportDiagnostic, NormalizationError> {
    require_object(overlap, "overlap probe")?;

    Ok(ViewportDiagnostic {
        viewport: viewport.to_string(),
        horizontal_scroll: dig_bool(overlap, &["horizontal_scroll"]),
        overlap_count: dig_u64(overlap, &["overlap_count"]),
    })
}

/// Signals gathered on the desktop signal visit.
pub fn desktop_signals(above_fold: &Value, overlap: &Value, layout_shift: &Value) -> Result<VisualSignals, NormalizationError> {
    require_object(above_fold, "above-the-fold probe")?;
    require_object(overlap, "overlap probe")?;
    require_object(layout_shift, "layout shift probe")?;

    let hero_found = dig_bool(above_fold, &["hero", "found"]).unwrap_or(false);

    Ok(VisualSignals {
        h1_visible_above_fold: dig_bool(above_fold, &["h1_visible"]),
        cta_visible_above_fold: dig_bool(above_fold, &["cta_visible"]),
        hero_media_visible_above_fold: if hero_found { dig_bool(above_fold, &["hero", "visible"]) } else { None },
        desktop_overlap_count: dig_u64(overlap, &["overlap_count"]),
        desktop_overflow_count: dig_bool(overlap, &["horizontal_scroll"]).map(u64::from),
        layout_shift_count: dig_u64(layout_shift, &["count"]),
        layout_shift_value: dig_non_negative(layout_shift, &["value"]).map(|v| round_to(v, 4)),
        ..VisualSignals::default()
    })
}

/// Signals gathered on the mobile signal visit.
pub fn mobile_signals(probe: &Value) -> Result<VisualSignals, NormalizationError> {
    require_object(probe, "mobile probe")?;

    let scroll_width = dig_non_negative(probe, &["scroll_width"]);
    let inner_width = dig_non_negative(probe, &["inner_width"]);

    Ok(VisualSignals {
        viewport_meta_present: dig_bool(probe, &["viewport_meta"]),
        horizontal_scroll_mobile: scroll_width.zip(inner_width).map(|(scroll, inner)| scroll > inner),
        mobile_min_font_px: dig_non_negative(probe, &["min_font_px"]).filter(|px| *px > 0.0),
        mobile_touch_targets_total: dig_u64(probe, &["touch_total"]),
        mobile_touch_targets_small: dig_u64(probe, &["touch_small"]),
        ..VisualSignals::default()
    })
}

fn require_object(value: &Value, what: &'static str) -> Result<(), NormalizationError> {
    if dig(value, &[]).is_some_and(Value::is_object) {
        Ok(())
    } else {
        Err(NormalizationError::UnexpectedShape(what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_viewport_diagnostic() {
        let diag = viewport_diagnostic("tablet", &json!({"overlap_count": 7, "horizontal_scroll": true})).unwrap();
        assert_eq!(diag.viewport, "tablet");
        assert_eq!(diag.overlap_count, Some(7));
        assert_eq!(diag.horizontal_scroll, Some(true));
    }

    #[test]
    fn test_viewport_diagnostic_rejects_non_object() {
        let err = viewport_diagnostic("tablet", &json!(null)).unwrap_err();
        assert!(matches!(err, NormalizationError::UnexpectedShape(_)));
    }

    #[test]
    fn test_desktop_signals() {
        let signals = desktop_signals(
            &json!({"h1_visible": true, "cta_visible": false, "hero": {"found": true, "visible": false}}),
            &json!({"overlap_count": 4, "horizontal_scroll": true}),
            &json!({"count": 3, "value": 0.123_456}),
        )
        .unwrap();

        assert_eq!(signals.h1_visible_above_fold, Some(true));
        assert_eq!(signals.cta_visible_above_fold, Some(false));
        assert_eq!(signals.hero_media_visible_above_fold, Some(false));
        assert_eq!(signals.desktop_overlap_count, Some(4));
        assert_eq!(signals.desktop_overflow_count, Some(1));
        assert_eq!(signals.layout_shift_count, Some(3));
        assert_eq!(signals.layout_shift_value, Some(0.1235));
    }

    #[test]
    fn test_desktop_signals_without_hero() {
        let signals = desktop_signals(
            &json!({"h1_visible": false, "cta_visible": false, "hero": {"found": false, "visible": false}}),
            &json!({}),
            &json!({}),
        )
        .unwrap();

        assert_eq!(signals.hero_media_visible_above_fold, None);
        assert_eq!(signals.desktop_overlap_count, None);
        assert_eq!(signals.layout_shift_value, None);
    }

    #[test]
    fn test_mobile_signals() {
        let signals = mobile_signals(&json!({
            "viewport_meta": true,
            "scroll_width": 420,
            "inner_width": 375,
            "min_font_px": 12.5,
            "touch_total": 10,
            "touch_small": 4
        }))
        .unwrap();

        assert_eq!(signals.viewport_meta_present, Some(true));
        assert_eq!(signals.horizontal_scroll_mobile, Some(true));
        assert_eq!(signals.mobile_min_font_px, Some(12.5));
        assert_eq!(signals.mobile_touch_targets_total, Some(10));
        assert_eq!(signals.mobile_touch_targets_small, Some(4));
    }

    #[test]
    fn test_mobile_signals_null_font_is_absent() {
        let signals = mobile_signals(&json!({"min_font_px": null, "scroll_width": 375})).unwrap();
        assert_eq!(signals.mobile_min_font_px, None);
        assert_eq!(signals.horizontal_scroll_mobile, None);
    }
}
