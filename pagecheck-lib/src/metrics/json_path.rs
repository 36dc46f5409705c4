//! Optional-path extraction over loosely-typed JSON documents.
//!
//! Any break in a path (missing key, non-object node) yields `None`; nothing here panics or
//! fails on an unexpected shape.

use serde_json::Value;

/// Descend `path` one key at a time, short-circuiting on the first missing step.
#[must_use]
pub fn dig<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_object()?.get(*key))
}

/// Number at `path`, accepting integers and floats alike.
#[must_use]
pub fn dig_f64(root: &Value, path: &[&str]) -> Option<f64> {
    dig(root, path)?.as_f64().filter(|v| v.is_finite())
}

/// Non-negative number at `path`.
///
/// Negative values are treated as absent: every metric read through this is a duration,
/// count, or score that cannot legitimately be below zero.
#[must_use]
pub fn dig_non_negative(root: &Value, path: &[&str]) -> Option<f64> {
    dig_f64(root, path).filter(|v| *v >= 0.0)
}

/// Whole, non-negative number at `path`.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "checked to be a whole non-negative number first")]
pub fn dig_u64(root: &Value, path: &[&str]) -> Option<u64> {
    let value = dig(root, path)?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
}

/// Boolean at `path`.
#[must_use]
pub fn dig_bool(root: &Value, path: &[&str]) -> Option<bool> {
    dig(root, path)?.as_bool()
}

/// Non-empty string at `path`.
#[must_use]
pub fn dig_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    dig(root, path)?.as_str().filter(|s| !s.is_empty())
}

/// Object at `path` that has at least one entry.
#[must_use]
pub fn dig_non_empty_object<'a>(root: &'a Value, path: &[&str]) -> Option<&'a serde_json::Map<String, Value>> {
    dig(root, path)?.as_object().filter(|m| !m.is_empty())
}
