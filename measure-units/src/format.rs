//! Human-readable unit rendering
//!
//! Integer exponents become superscripts and product terms are separated
//! by spaces: `kg*m/s^2` displays as `kg m/s²`. Integer exponents inside
//! compound symbols are superscripted too: `(lb/in^2)` displays as `(lb/in²)`.

use std::sync::LazyLock;
use regex::{Captures, Regex};
use crate::dimension::DimensionTable;
use crate::unit::UnitSymbol;

static INNER_EXPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\^(-?[0-9]+(?:\.[0-9]+)?)").expect("inner exponent pattern is valid")
});

/// Render a dimension table for display; empty for dimensionless tables
pub fn display_units(units: &DimensionTable) -> String {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();

    for (symbol, exp) in units.iter() {
        if exp > 0.0 {
            numerator.push(display_term(symbol, exp));
        } else {
            denominator.push(display_term(symbol, -exp));
        }
    }

    if denominator.is_empty() {
        return numerator.join(" ");
    }
    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join(" ")
    };
    format!("{}/{}", numerator, denominator.join(" "))
}

fn display_term(symbol: &UnitSymbol, exp: f64) -> String {
    let symbol = display_symbol(symbol);
    if exp == 1.0 {
        symbol
    } else if exp.fract() == 0.0 && exp.abs() < 1e15 {
        format!("{}{}", symbol, superscript(exp as i64))
    } else {
        format!("{}^{}", symbol, exp)
    }
}

/// Symbol text with integer exponents inside compounds superscripted
fn display_symbol(symbol: &UnitSymbol) -> String {
    if !symbol.is_compound() {
        return symbol.to_string();
    }
    INNER_EXPONENT
        .replace_all(symbol.as_str(), |caps: &Captures| {
            if caps[1].contains('.') {
                caps[0].to_string()
            } else {
                superscript_digits(&caps[1])
            }
        })
        .into_owned()
}

/// Superscript digits for an integer, e.g. `-12` -> `⁻¹²`
pub fn superscript(n: i64) -> String {
    superscript_digits(&n.to_string())
}

fn superscript_digits(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}
