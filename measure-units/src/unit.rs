//! Unit symbols
//!
//! A symbol is an opaque token such as `in`, `kg` or `(btu/hr)`. Symbols
//! wrapped in parentheses are atomic: the `*`, `/` and `^` inside them are
//! part of the name, not algebra.

use std::borrow::Borrow;
use std::fmt;
use serde::{Serialize, Deserialize};
use measure_core::MeasureError;

/// Reserved symbol carried by the zero sentinel
pub const ZERO_SYMBOL: &str = "ZERO_NO_UNITS";

/// A validated unit symbol
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitSymbol(String);

impl UnitSymbol {
    /// Validate and wrap a symbol
    ///
    /// Rejects empty symbols, whitespace, unbalanced parentheses and
    /// operator characters outside parentheses.
    pub fn new(symbol: impl Into<String>) -> Result<Self, MeasureError> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(MeasureError::invalid("missing unit symbol"));
        }
        if symbol.chars().any(char::is_whitespace) {
            return Err(MeasureError::invalid(format!(
                "unit symbol '{}' contains whitespace", symbol
            )));
        }

        let mut depth = 0usize;
        for c in symbol.chars() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        MeasureError::invalid(format!("unbalanced ')' in unit '{}'", symbol))
                    })?;
                }
                '*' | '/' | '^' if depth == 0 => {
                    return Err(MeasureError::invalid(format!(
                        "operator '{}' in unit symbol '{}' must be parenthesized", c, symbol
                    )));
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(MeasureError::invalid(format!("unbalanced '(' in unit '{}'", symbol)));
        }

        Ok(UnitSymbol(symbol))
    }

    /// The zero sentinel's symbol
    pub fn zero() -> Self {
        UnitSymbol(ZERO_SYMBOL.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the symbol is a parenthesized compound such as `(btu/hr)`
    ///
    /// The opening parenthesis must close at the final character, so
    /// `(a)(b)` is not a compound.
    pub fn is_compound(&self) -> bool {
        if !self.0.starts_with('(') {
            return false;
        }
        let mut depth = 0usize;
        for (i, c) in self.0.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + c.len_utf8() == self.0.len();
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// The expression inside a compound symbol's outer parentheses
    pub fn inner_expression(&self) -> Option<&str> {
        if self.is_compound() {
            Some(&self.0[1..self.0.len() - 1])
        } else {
            None
        }
    }
}

impl fmt::Display for UnitSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for UnitSymbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UnitSymbol {
    type Error = MeasureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UnitSymbol::new(value)
    }
}

impl TryFrom<&str> for UnitSymbol {
    type Error = MeasureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        UnitSymbol::new(value)
    }
}

impl From<UnitSymbol> for String {
    fn from(symbol: UnitSymbol) -> Self {
        symbol.0
    }
}
