// Copyright 2026 the Handline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenient integer parsing for per-element overrides.
//!
//! Override attributes come from markup, so they are parsed the way a browser
//! parses integers: leading whitespace is skipped, an optional sign is
//! accepted, and parsing stops at the first non-digit (`"12px"` is `12`,
//! `"3.9"` is `3`). A value with no leading digits, or a negative value, is
//! rejected.

/// Parses the leading non-negative integer in `value`.
///
/// Returns `None` when `value` is absent, has no leading digits, or is
/// negative. Values larger than `u32::MAX` saturate.
#[must_use]
pub fn parse_positive_int(value: Option<&str>) -> Option<u32> {
    let s = value?.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0_u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    });

    // `-0` is still zero.
    if negative && magnitude != 0 {
        return None;
    }
    Some(magnitude)
}

/// Like [`parse_positive_int`], returning `default` when parsing fails.
#[must_use]
pub fn parse_positive_int_or(value: Option<&str>, default: f64) -> f64 {
    parse_positive_int(value).map_or(default, f64::from)
}
