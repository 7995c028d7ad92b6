//! Numeric literal parsing
//!
//! Accepts the free-form numbers people write next to units: decimals
//! ("2.5"), stand-alone fractions ("7/8") and mixed numbers ("6 1/8").
//! Characters that cannot belong to such a literal are discarded first,
//! so stray unit text never reaches the float parser.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Error type for numeric literal parsing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("cannot parse '{0}' as a number")]
    NotANumber(String),

    #[error("value must be finite, got {0}")]
    NotFinite(f64),
}

static NON_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9/. -]").expect("literal filter pattern is valid"));

/// Parse a decimal, fraction or mixed number
///
/// Supports: "42", "-3.5", "7/8", "9.25/1000", "6 1/8", "-6 1/8".
/// An input that is empty after cleanup parses as `0`.
pub fn parse_number(s: &str) -> Result<f64, NumberError> {
    let cleaned = NON_LITERAL.replace_all(s, "");
    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_suffix('/').unwrap_or(cleaned).trim();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    let has_space = cleaned.contains(' ');
    let has_slash = cleaned.contains('/');

    // Plain decimal; "1.5/2" falls through to the fraction rules
    if cleaned.contains('.') || (!has_space && !has_slash) {
        if let Ok(value) = cleaned.parse::<f64>() {
            return ensure_finite(value);
        }
    }

    let parts: Vec<&str> = cleaned
        .split(|c| c == ' ' || c == '/')
        .filter(|p| !p.is_empty())
        .collect();
    let not_a_number = || NumberError::NotANumber(s.trim().to_string());
    let part = |p: &str| p.parse::<f64>().map_err(|_| not_a_number());

    let value = match parts[..] {
        [num, den] if !has_space => part(num)? / part(den)?,
        // the fraction is always added: "-6 1/8" is -5.875
        [whole, num, den] => part(whole)? + part(num)? / part(den)?,
        _ => return Err(not_a_number()),
    };

    ensure_finite(value)
}

/// Reject NaN and infinities
pub fn ensure_finite(value: f64) -> Result<f64, NumberError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumberError::NotFinite(value))
    }
}
