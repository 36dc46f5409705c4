//! In-page probe scripts.
//!
//! Each script is a WebDriver script body: it runs as a function and returns (or, for the
//! async probe, passes to its callback) a small JSON object of counts and booleans. A probe
//! leaves a key out rather than guess when the browser cannot answer.

/// Overlap samples and horizontal overflow at the current viewport.
pub const OVERLAP: &str = r#"
const isVisible = (node) => {
    const style = window.getComputedStyle(node);
    if (!style) return false;
    if (style.display === 'none' || style.visibility === 'hidden' || parseFloat(style.opacity || '1') === 0) return false;
    return true;
};
const selectors = 'a, button, input, textarea, select, [role="button"], h1, h2, h3, p, img';
const nodes = Array.from(document.querySelectorAll(selectors)).slice(0, 260);
let overlaps = 0;
for (const node of nodes) {
    if (!isVisible(node)) continue;
    const r = node.getBoundingClientRect();
    if (!r || r.width < 8 || r.height < 8) continue;
    if (r.bottom <= 0 || r.right <= 0 || r.top >= window.innerHeight || r.left >= window.innerWidth) continue;
    const cx = Math.min(window.innerWidth - 1, Math.max(0, r.left + (r.width / 2)));
    const cy = Math.min(window.innerHeight - 1, Math.max(0, r.top + (r.height / 2)));
    const topNode = document.elementFromPoint(cx, cy);
    if (!topNode) continue;
    if (topNode === node || node.contains(topNode) || topNode.contains(node)) continue;
    overlaps += 1;
    if (overlaps >= 40) break;
}
return {
    overlap_count: overlaps,
    horizontal_scroll: document.documentElement.scrollWidth > window.innerWidth,
};
"#;

/// Whether the H1, a call to action, and hero media start inside the first viewport.
pub const ABOVE_FOLD: &str = r#"
const fold = window.innerHeight;
const startsAboveFold = (node) => {
    if (!node) return false;
    const r = node.getBoundingClientRect();
    return r.top + window.scrollY < fold;
};
const ctaSelectors = ["a[href*='signup']", "a[href*='demo']", "a[href*='contact']", 'button', '.cta', "[class*='cta']"];
let ctaVisible = false;
for (const selector of ctaSelectors) {
    let node = null;
    try { node = document.querySelector(selector); } catch (err) { node = null; }
    if (node && startsAboveFold(node)) { ctaVisible = true; break; }
}
let hero = { found: false, visible: false };
for (const selector of ['main img', 'header img', 'section img', '[class*="hero"] img', 'video']) {
    const node = document.querySelector(selector);
    if (!node) continue;
    const r = node.getBoundingClientRect();
    if (!r || r.width <= 0 || r.height <= 0) continue;
    hero = { found: true, visible: r.top < window.innerHeight && r.bottom > 0 };
    break;
}
return {
    h1_visible: startsAboveFold(document.querySelector('h1')),
    cta_visible: ctaVisible,
    hero: hero,
};
"#;

/// Buffered layout-shift entries not caused by user input.
///
/// Resolves with an empty object when the browser does not expose layout-shift entries.
pub const LAYOUT_SHIFT: &str = "
const done = arguments[arguments.length - 1];
let count = 0;
let value = 0;
try {
    const observer = new PerformanceObserver((list) => {
        for (const entry of list.getEntries()) {
            if (!entry.hadRecentInput) {
                count += 1;
                value += Number(entry.value || 0);
            }
        }
    });
    observer.observe({ type: 'layout-shift', buffered: true });
    setTimeout(() => { observer.disconnect(); done({ count: count, value: value }); }, 250);
} catch (err) {
    done({});
}
";

/// Mobile readability and tap-target signals.
pub const MOBILE: &str = r#"
let minFont = null;
for (const node of document.querySelectorAll('body *')) {
    const s = window.getComputedStyle(node);
    if (!s) continue;
    const size = parseFloat(s.fontSize || '0');
    if (!Number.isFinite(size) || size <= 0) continue;
    minFont = minFont === null ? size : Math.min(minFont, size);
}
let total = 0;
let small = 0;
for (const node of document.querySelectorAll('a, button, input, textarea, select, [role="button"]')) {
    const r = node.getBoundingClientRect();
    if (r.width <= 0 || r.height <= 0) continue;
    total += 1;
    if (r.width < 48 || r.height < 48) small += 1;
}
return {
    viewport_meta: document.querySelector("meta[name='viewport']") !== null,
    scroll_width: document.documentElement.scrollWidth,
    inner_width: window.innerWidth,
    min_font_px: minFont,
    touch_total: total,
    touch_small: small,
};
"#;
