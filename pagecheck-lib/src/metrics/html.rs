//! Structural signal extraction from raw page source.
//!
//! This is a pattern scan, not an HTML parser: counts are estimates that only need to be
//! stable for identical input.

use super::StructuralSignals;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").expect("invalid regex"));
static IMG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b([^>]*)>").expect("invalid regex"));
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").expect("invalid regex"));
static STYLESHEET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link\b[^>]*rel=["'][^"']*stylesheet[^"']*["'][^>]*>"#).expect("invalid regex"));
static PRELOAD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link\b[^>]*rel=["'][^"']*preload[^"']*["'][^>]*>"#).expect("invalid regex"));
static SRC_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)\bsrc=["']([^"']+)["']"#).expect("invalid regex"));
static ASYNC_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(async|defer)\b").expect("invalid regex"));
static MODULE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)type=["']module["']"#).expect("invalid regex"));
static WIDTH_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bwidth\s*=").expect("invalid regex"));
static HEIGHT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bheight\s*=").expect("invalid regex"));

/// A fetched HTML document as handed over by the static inspection collector.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// Body decoded as text.
    pub text: String,

    /// Length of the raw body in bytes, before decoding.
    pub byte_len: u64,

    /// URL the document was finally served from, after redirects.
    pub final_url: Url,
}

/// Scan a document for the structural signals used by the fallback heuristic.
#[must_use]
pub fn scan(doc: &HtmlDocument) -> StructuralSignals {
    let text = doc.text.as_str();
    let page_host = doc.final_url.host_str().map(str::to_ascii_lowercase);

    let mut external_scripts = 0u64;
    let mut sync_external_scripts = 0u64;
    let mut third_party_scripts = 0u64;
    let mut inline_script_bytes = 0u64;

    for caps in SCRIPT_REGEX.captures_iter(text) {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());

        if let Some(src) = SRC_ATTR_REGEX.captures(attrs).and_then(|c| c.get(1)) {
            external_scripts += 1;

            let src_host = doc
                .final_url
                .join(src.as_str().trim())
                .ok()
                .and_then(|absolute| absolute.host_str().map(str::to_ascii_lowercase));
            if let (Some(src_host), Some(page_host)) = (&src_host, &page_host)
                && src_host != page_host
            {
                third_party_scripts += 1;
            }

            if !ASYNC_REGEX.is_match(attrs) && !MODULE_REGEX.is_match(attrs) {
                sync_external_scripts += 1;
            }
        } else {
            inline_script_bytes += body.len() as u64;
        }
    }

    let mut images_total = 0u64;
    let mut images_missing_dimensions = 0u64;
    for caps in IMG_REGEX.captures_iter(text) {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        images_total += 1;
        if !WIDTH_REGEX.is_match(attrs) || !HEIGHT_REGEX.is_match(attrs) {
            images_missing_dimensions += 1;
        }
    }

    StructuralSignals {
        final_url: Some(doc.final_url.to_string()),
        html_bytes: Some(doc.byte_len),
        dom_node_estimate: Some(TAG_REGEX.find_iter(text).count() as u64),
        external_script_count: Some(external_scripts),
        sync_external_script_count: Some(sync_external_scripts),
        third_party_script_count: Some(third_party_scripts),
        inline_script_bytes: Some(inline_script_bytes),
        stylesheet_count: Some(STYLESHEET_REGEX.find_iter(text).count() as u64),
        preload_count: Some(PRELOAD_REGEX.find_iter(text).count() as u64),
        images_total: Some(images_total),
        images_missing_dimensions: Some(images_missing_dimensions),
    }
}
