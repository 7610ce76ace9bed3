// src/core/sanitize.rs

/// Vendor numeral → odds. Decimal comma accepted; only finite values > 0 survive.
pub fn parse_odds(text: &str) -> Option<f64> {
    let v: f64 = text.trim().replace(',', ".").parse().ok()?;
    (v.is_finite() && v > 0.0).then_some(v)
}

/// Non-empty and ASCII digits only.
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `None` for empty (after trim), else the trimmed text.
pub fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(s!(t)) }
}
