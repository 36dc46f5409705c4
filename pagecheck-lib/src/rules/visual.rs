use super::rule::{Rule, decimal, evaluate, rule};
use super::{Issue, Priority};
use crate::metrics::VisualSignals;

/// Smallest readable body text on mobile, in CSS pixels.
pub const MIN_FONT_PX: f64 = 16.0;

/// Rules evaluated against the merged browser signals.
pub static VISUAL_RULES: &[Rule<VisualSignals>] = &[
    rule!("mobile_horizontal_scroll", NoFinding, |s, absence| {
        absence.resolve(s.horizontal_scroll_mobile).filter(|scrolls| *scrolls).map(|_| {
            Issue::new(
                Priority::High,
                "Horizontal scrolling on mobile viewport",
                "Layout exceeds viewport width on mobile.",
                "Constrain overflowing elements and review fixed-width blocks.",
            )
        })
    }),
    rule!("mobile_font_size", NoFinding, |s, absence| {
        absence.resolve(s.mobile_min_font_px).filter(|px| *px < MIN_FONT_PX).map(|px| {
            Issue::new(
                Priority::Medium,
                "Mobile font size below readability baseline",
                format!("Minimum detected mobile font size is {px}px."),
                "Increase base text size to at least 16px for body copy.",
            )
        })
    }),
    rule!("touch_targets", NoFinding, |s, absence| {
        let total = absence.resolve(s.mobile_touch_targets_total)?;
        let small = absence.resolve(s.mobile_touch_targets_small)?;
        (total > 0 && small > 0).then(|| {
            Issue::new(
                Priority::Medium,
                "Small touch targets detected",
                format!("{small}/{total} targets are below 48px."),
                "Increase tap areas for links/buttons used in primary navigation and CTAs.",
            )
        })
    }),
    rule!("hero_media", NoFinding, |s, absence| {
        absence.resolve(s.hero_media_visible_above_fold).filter(|visible| !*visible).map(|_| {
            Issue::new(
                Priority::Medium,
                "Hero media is not visible above the fold",
                "Detected hero media appears below the initial viewport.",
                "Reposition critical hero media/content so primary context loads in the first viewport.",
            )
        })
    }),
    rule!("desktop_overlap", NoFinding, |s, absence| {
        match absence.resolve(s.desktop_overlap_count)? {
            n if n >= 8 => Some(Issue::new(
                Priority::High,
                "Overlapping desktop elements detected",
                format!("Detected {n} potential overlap intersections in the desktop viewport."),
                "Resolve stacking/positioning conflicts and verify key CTAs/text are unobstructed.",
            )),
            n if n >= 3 => Some(Issue::new(
                Priority::Medium,
                "Potential desktop overlap risk",
                format!("Detected {n} overlap intersections in the desktop viewport sample."),
                "Review component spacing and z-index rules across major sections.",
            )),
            _ => None,
        }
    }),
    rule!("desktop_overflow", NoFinding, |s, absence| {
        absence.resolve(s.desktop_overflow_count).filter(|n| *n > 0).map(|_| {
            Issue::new(
                Priority::Medium,
                "Desktop horizontal overflow detected",
                "Desktop viewport shows content width overflow.",
                "Constrain wide components and avoid fixed-width blocks beyond viewport bounds.",
            )
        })
    }),
    rule!("layout_shift", TreatAsZero, |s, absence| {
        let value = absence.resolve(s.layout_shift_value)?;
        let count = absence.resolve(s.layout_shift_count)?;
        let detail = format!("Layout shift value sampled at {} with {count} shift events.", decimal(value));

        if value > 0.25 {
            Some(Issue::new(
                Priority::High,
                "High layout shift instability detected",
                detail,
                "Reserve dimensions for late-loading elements and stabilize dynamic inserts/fonts.",
            ))
        } else if value > 0.1 || count >= 8 {
            Some(Issue::new(
                Priority::Medium,
                "Moderate layout shift risk detected",
                detail,
                "Audit late-rendering UI blocks and add dimension placeholders for media/embeds.",
            ))
        } else {
            None
        }
    }),
    rule!("responsive_breakpoints", NoFinding, |s, absence| {
        absence.resolve(s.responsive_breakpoint_failures).filter(|n| *n > 0).map(|n| {
            Issue::new(
                Priority::Medium,
                "Responsive breakpoint layout stress",
                format!("{n} non-desktop breakpoints showed overflow or overlap stress."),
                "Test laptop/tablet/mobile breakpoints and adjust layout rules where overflow or overlap occurs.",
            )
        })
    }),
];

/// Findings for the merged browser signals.
#[must_use]
pub fn visual_issues(signals: &VisualSignals) -> Vec<Issue> {
    evaluate(VISUAL_RULES, signals)
}

/// Low-priority finding for one browser visit that produced no data.
#[must_use]
pub fn visit_failed_issue(label: &str, reason: &str) -> Issue {
    Issue::new(
        Priority::Low,
        format!("Browser visit '{label}' failed"),
        reason,
        "Rerun the visual audit once the page renders reliably in the automated browser.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_signals_produce_nothing() {
        assert!(visual_issues(&VisualSignals::default()).is_empty());
    }

    #[test]
    fn test_mobile_findings() {
        let signals = VisualSignals {
            horizontal_scroll_mobile: Some(true),
            mobile_min_font_px: Some(12.0),
            mobile_touch_targets_total: Some(40),
            mobile_touch_targets_small: Some(9),
            ..VisualSignals::default()
        };

        let issues = visual_issues(&signals);
        let titles: Vec<_> = issues.iter().map(Issue::title).collect();
        assert_eq!(
            titles,
            [
                "Horizontal scrolling on mobile viewport",
                "Mobile font size below readability baseline",
                "Small touch targets detected",
            ]
        );
        assert_eq!(issues[0].priority(), Priority::High);
        assert_eq!(issues[1].detail(), "Minimum detected mobile font size is 12px.");
        assert_eq!(issues[2].detail(), "9/40 targets are below 48px.");
    }

    #[test]
    fn test_no_touch_targets_means_no_finding() {
        let signals = VisualSignals {
            mobile_touch_targets_total: Some(0),
            mobile_touch_targets_small: Some(0),
            ..VisualSignals::default()
        };
        assert!(visual_issues(&signals).is_empty());
    }

    #[test]
    fn test_overlap_tiers() {
        let at = |n| VisualSignals {
            desktop_overlap_count: Some(n),
            ..VisualSignals::default()
        };

        assert!(visual_issues(&at(2)).is_empty());
        assert_eq!(visual_issues(&at(3))[0].priority(), Priority::Medium);
        assert_eq!(visual_issues(&at(7))[0].title(), "Potential desktop overlap risk");
        assert_eq!(visual_issues(&at(8))[0].priority(), Priority::High);
    }

    #[test]
    fn test_layout_shift_tiers() {
        let at = |value, count| VisualSignals {
            layout_shift_value: value,
            layout_shift_count: count,
            ..VisualSignals::default()
        };

        let high = visual_issues(&at(Some(0.3), Some(2)));
        assert_eq!(high[0].title(), "High layout shift instability detected");
        assert_eq!(high[0].detail(), "Layout shift value sampled at 0.3 with 2 shift events.");

        let by_value = visual_issues(&at(Some(0.15), Some(1)));
        assert_eq!(by_value[0].priority(), Priority::Medium);

        // a missing value counts as zero, so the event count alone can trigger
        let by_count = visual_issues(&at(None, Some(8)));
        assert_eq!(by_count[0].title(), "Moderate layout shift risk detected");
        assert_eq!(by_count[0].detail(), "Layout shift value sampled at 0.0 with 8 shift events.");

        assert!(visual_issues(&at(Some(0.1), Some(7))).is_empty());
    }

    #[test]
    fn test_hero_only_fires_when_known_hidden() {
        let hidden = VisualSignals {
            hero_media_visible_above_fold: Some(false),
            ..VisualSignals::default()
        };
        assert_eq!(visual_issues(&hidden).len(), 1);

        let visible = VisualSignals {
            hero_media_visible_above_fold: Some(true),
            ..VisualSignals::default()
        };
        assert!(visual_issues(&visible).is_empty());
    }

    #[test]
    fn test_desktop_rule_order() {
        let signals = VisualSignals {
            hero_media_visible_above_fold: Some(false),
            desktop_overlap_count: Some(10),
            desktop_overflow_count: Some(1),
            layout_shift_value: Some(0.4),
            layout_shift_count: Some(3),
            responsive_breakpoint_failures: Some(2),
            ..VisualSignals::default()
        };

        let titles: Vec<_> = visual_issues(&signals).iter().map(|i| i.title().to_string()).collect();
        assert_eq!(
            titles,
            [
                "Hero media is not visible above the fold",
                "Overlapping desktop elements detected",
                "Desktop horizontal overflow detected",
                "High layout shift instability detected",
                "Responsive breakpoint layout stress",
            ]
        );
    }
}
