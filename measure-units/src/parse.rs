//! Unit string parsing - parse expressions like "lb/in^2" or "kg*m/s²"
//!
//! Grammar, outermost first:
//! - at most one `/` outside parentheses splits numerator and denominator
//! - `*` outside parentheses separates terms
//! - `^` outside parentheses separates a symbol from its exponent
//! - `(...)` makes a compound symbol atomic, e.g. `(btu/hr)`
//!
//! Unicode superscripts are accepted anywhere an exponent is.

use std::sync::LazyLock;
use regex::{Captures, Regex};
use measure_core::{parse_number, MeasureError, Result};
use crate::dimension::DimensionTable;
use crate::unit::UnitSymbol;

static SUPERSCRIPT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[⁻⁰¹²³⁴⁵⁶⁷⁸⁹]+").expect("superscript pattern is valid"));

/// Rewrite superscript exponents as `^` notation (`m²` -> `m^2`)
pub fn normalize_superscripts(s: &str) -> String {
    SUPERSCRIPT_RUN
        .replace_all(s, |caps: &Captures| {
            let digits: String = caps[0].chars().map(from_superscript).collect();
            format!("^{}", digits)
        })
        .into_owned()
}

fn from_superscript(c: char) -> char {
    match c {
        '⁻' => '-',
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        other => other,
    }
}

/// Parse a unit expression into an (unsimplified) dimension table
///
/// Supported formats:
/// - Simple: "m", "kg", "(btu/hr)"
/// - Powers: "m^2", "s^-1", "m²", "s⁻¹"
/// - Products: "ft*lb"
/// - Quotients: "m/s", "/s", "1/s", "lb/in^2"
/// - Combined: "kg*m/s^2"
pub fn parse_units(expr: &str) -> Result<DimensionTable> {
    let expr = normalize_superscripts(expr.trim());
    let mut table = DimensionTable::new();
    if expr.is_empty() {
        return Ok(table);
    }

    let parts = split_top_level(&expr, '/')?;
    let (numerator, denominator) = match parts[..] {
        [numerator] => (numerator, ""),
        [numerator, denominator] => (numerator, denominator),
        _ => {
            return Err(MeasureError::invalid(format!(
                "extra '/' symbols must be contained in parentheses: '{}'", expr
            )))
        }
    };

    let numerator = numerator.trim();
    if numerator != "1" && numerator.parse::<f64>().is_ok() {
        return Err(MeasureError::invalid(format!(
            "units cannot have scalar values: '{}'", expr
        )));
    }

    for term in split_top_level(numerator, '*')? {
        if let Some((symbol, exp)) = parse_term(term)? {
            table.accumulate(symbol, exp);
        }
    }
    for term in split_top_level(denominator, '*')? {
        if let Some((symbol, exp)) = parse_term(term)? {
            table.accumulate(symbol, -exp);
        }
    }

    Ok(table)
}

/// Parse one `symbol` or `symbol^exponent` term; `None` for empty or `1`
fn parse_term(term: &str) -> Result<Option<(UnitSymbol, f64)>> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(None);
    }

    let pieces = split_top_level(term, '^')?;
    let (symbol, exp) = match pieces[..] {
        [symbol] => (symbol.trim(), 1.0),
        [symbol, exp] => (symbol.trim(), parse_exponent(exp)?),
        _ => {
            return Err(MeasureError::invalid(format!(
                "extra '^' symbols must be contained in parentheses: '{}'", term
            )))
        }
    };

    if symbol == "1" {
        return Ok(None);
    }
    if symbol.parse::<f64>().is_ok() {
        return Err(MeasureError::invalid(format!(
            "units cannot have scalar values: '{}'", term
        )));
    }

    Ok(Some((UnitSymbol::new(symbol)?, exp)))
}

/// Exponent as a decimal ("2", "-1", "0.5") or parenthesized fraction ("(1/2)")
fn parse_exponent(s: &str) -> Result<f64> {
    let s = s.trim();
    let invalid = || MeasureError::invalid(format!("invalid exponent: '{}'", s));

    let inner = s
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s)
        .trim();

    let exp = match inner.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| invalid())?;
            let den: f64 = den.trim().parse().map_err(|_| invalid())?;
            num / den
        }
        None => inner.parse().map_err(|_| invalid())?,
    };

    if exp.is_finite() {
        Ok(exp)
    } else {
        Err(invalid())
    }
}

/// Split on `sep` wherever it is not enclosed in parentheses
fn split_top_level(s: &str, sep: char) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    MeasureError::invalid(format!("unbalanced ')' in '{}'", s))
                })?;
            }
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(MeasureError::invalid(format!("unbalanced '(' in '{}'", s)));
    }

    parts.push(&s[start..]);
    Ok(parts)
}

/// Split measurement text into its numeric value and unit expression
///
/// The last whitespace-separated token is the unit. Any later token that
/// is not numeric-literal text is an extra unit factor, so
/// `"5 kg m/s²"` reads as `5` with units `kg*m/s^2` and `"6 1/8 in"` reads
/// as `6.125` with units `in`.
pub fn parse_measurement_text(text: &str) -> Result<(f64, String)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some((&last, leading)) = tokens.split_last() else {
        return Err(MeasureError::invalid("measurement text is empty"));
    };
    if leading.is_empty() {
        return Err(MeasureError::invalid(format!(
            "measurement needs a value and units: '{}'", text.trim()
        )));
    }

    let mut units = last.to_string();
    let mut value_tokens = Vec::new();
    for (i, &token) in leading.iter().enumerate() {
        if i > 0 && !is_literal_token(token) {
            units = format!("{}*{}", token, units);
        } else {
            value_tokens.push(token);
        }
    }

    let value = parse_number(&value_tokens.join(" "))?;
    Ok((value, normalize_superscripts(&units)))
}

fn is_literal_token(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '/' | '.' | '-'))
}
