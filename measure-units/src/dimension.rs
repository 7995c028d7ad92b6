//! Dimension tables
//!
//! A dimension table represents a unit expression as a product of powers:
//! `lb/in^2` is `{ in: -2, lb: 1 }`. Keys are kept in lexical order so
//! every algorithm that walks a table does so deterministically, and
//! entries whose exponent reaches zero are dropped.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use crate::unit::{UnitSymbol, ZERO_SYMBOL};

/// Mapping from unit symbol to exponent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionTable {
    entries: BTreeMap<UnitSymbol, f64>,
}

impl DimensionTable {
    /// Dimensionless table (no entries)
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of the zero sentinel
    pub fn zero_sentinel() -> Self {
        let mut table = Self::new();
        table.entries.insert(UnitSymbol::zero(), 1.0);
        table
    }

    /// Add `exponent` to the symbol's current exponent
    pub fn accumulate(&mut self, symbol: UnitSymbol, exponent: f64) {
        let total = self.entries.get(&symbol).copied().unwrap_or(0.0) + exponent;
        if total == 0.0 {
            self.entries.remove(&symbol);
        } else {
            self.entries.insert(symbol, total);
        }
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries.get(symbol).copied()
    }

    pub fn remove(&mut self, symbol: &str) -> Option<f64> {
        self.entries.remove(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in lexical symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&UnitSymbol, f64)> + '_ {
        self.entries.iter().map(|(symbol, &exp)| (symbol, exp))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &UnitSymbol> + '_ {
        self.entries.keys()
    }

    /// Check if this is exactly the zero sentinel's table
    pub fn is_zero_sentinel(&self) -> bool {
        self.entries.len() == 1 && self.entries.get(ZERO_SYMBOL) == Some(&1.0)
    }

    /// Multiply every exponent by `factor`
    pub fn scaled(&self, factor: f64) -> DimensionTable {
        let mut result = DimensionTable::new();
        for (symbol, exp) in self.iter() {
            result.accumulate(symbol.clone(), exp * factor);
        }
        result
    }

    /// Negate every exponent
    pub fn inverted(&self) -> DimensionTable {
        self.scaled(-1.0)
    }

    /// Multiply two tables (add exponents)
    pub fn multiply(&self, other: &DimensionTable) -> DimensionTable {
        let mut result = self.clone();
        for (symbol, exp) in other.iter() {
            result.accumulate(symbol.clone(), exp);
        }
        result
    }

    /// Divide two tables (subtract exponents)
    pub fn divide(&self, other: &DimensionTable) -> DimensionTable {
        self.multiply(&other.inverted())
    }

    /// Compare tables, tolerating one global inversion
    ///
    /// Two tables match when they carry the same symbols and either every
    /// exponent is equal or every exponent is negated.
    pub fn same_units(&self, other: &DimensionTable) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        if self == other {
            return true;
        }
        self.iter().all(|(symbol, exp)| other.get(symbol.as_str()) == Some(-exp))
    }

    /// Canonical ASCII rendering, e.g. `ft*lb/in^2*s`
    pub fn canonical(&self) -> String {
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();

        for (symbol, exp) in self.iter() {
            if exp > 0.0 {
                numerator.push(render_term(symbol, exp));
            } else {
                denominator.push(render_term(symbol, -exp));
            }
        }

        if denominator.is_empty() {
            return numerator.join("*");
        }
        let numerator = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join("*")
        };
        format!("{}/{}", numerator, denominator.join("*"))
    }
}

fn render_term(symbol: &UnitSymbol, exp: f64) -> String {
    if exp == 1.0 {
        symbol.to_string()
    } else {
        format!("{}^{}", symbol, exp)
    }
}

impl fmt::Display for DimensionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl FromIterator<(UnitSymbol, f64)> for DimensionTable {
    fn from_iter<I: IntoIterator<Item = (UnitSymbol, f64)>>(iter: I) -> Self {
        let mut table = DimensionTable::new();
        for (symbol, exp) in iter {
            table.accumulate(symbol, exp);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> UnitSymbol {
        UnitSymbol::new(s).unwrap()
    }

    fn table(entries: &[(&str, f64)]) -> DimensionTable {
        entries.iter().map(|(s, e)| (sym(s), *e)).collect()
    }

    #[test]
    fn test_accumulate_removes_zero() {
        let mut t = DimensionTable::new();
        t.accumulate(sym("m"), 1.0);
        t.accumulate(sym("m"), 1.0);
        assert_eq!(t.get("m"), Some(2.0));

        t.accumulate(sym("m"), -2.0);
        assert!(t.is_empty());
    }

    #[test]
    fn test_canonical_numerator_only() {
        assert_eq!(table(&[("m", 2.0)]).canonical(), "m^2");
        assert_eq!(table(&[("s", 1.0), ("m", 1.0)]).canonical(), "m*s");
    }

    #[test]
    fn test_canonical_with_denominator() {
        let t = table(&[("lb", 1.0), ("in", -2.0)]);
        assert_eq!(t.canonical(), "lb/in^2");

        let t = table(&[("s", -1.0)]);
        assert_eq!(t.canonical(), "1/s");

        let t = table(&[("kg", 1.0), ("m", 1.0), ("s", -2.0), ("K", -1.0)]);
        assert_eq!(t.canonical(), "kg*m/K*s^2");
    }

    #[test]
    fn test_canonical_empty() {
        assert_eq!(DimensionTable::new().canonical(), "");
    }

    #[test]
    fn test_canonical_fractional_exponent() {
        assert_eq!(table(&[("m", 0.5)]).canonical(), "m^0.5");
    }

    #[test]
    fn test_multiply_and_divide() {
        let a = table(&[("m", 1.0)]);
        let b = table(&[("m", 1.0), ("s", -1.0)]);
        assert_eq!(a.multiply(&b), table(&[("m", 2.0), ("s", -1.0)]));
        assert_eq!(a.divide(&b), table(&[("s", 1.0)]));
    }

    #[test]
    fn test_same_units_tolerates_inversion() {
        let a = table(&[("m", 1.0), ("s", -1.0)]);
        let b = table(&[("m", -1.0), ("s", 1.0)]);
        let c = table(&[("m", 1.0), ("s", 1.0)]);
        assert!(a.same_units(&a.clone()));
        assert!(a.same_units(&b));
        assert!(!a.same_units(&c));
        assert!(!a.same_units(&table(&[("m", 1.0)])));
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(DimensionTable::zero_sentinel().is_zero_sentinel());
        assert!(!table(&[("m", 1.0)]).is_zero_sentinel());
    }

    #[test]
    fn test_scaled_by_zero_is_dimensionless() {
        assert!(table(&[("m", 3.0)]).scaled(0.0).is_empty());
    }
}
