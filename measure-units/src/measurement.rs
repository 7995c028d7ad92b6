//! Measurement type - a value with an associated unit expression

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use measure_core::{ensure_finite, MeasureError, Result};
use crate::dimension::DimensionTable;
use crate::format::display_units;
use crate::parse::{parse_measurement_text, parse_units};
use crate::simplify::simplify;
use crate::units::{ConversionRegistry, ConversionTable};

/// A physical quantity: a finite value with a simplified dimension table
///
/// Measurements are immutable; every operation returns a new one.
/// Methods without an explicit registry use [`ConversionRegistry::global`].
#[derive(Debug, Clone)]
pub struct Measurement {
    value: f64,
    units: DimensionTable,
    display_units: Option<String>,
}

impl Measurement {
    /// Wrap already-simplified parts, rejecting non-finite values
    pub(crate) fn from_parts(value: f64, units: DimensionTable) -> Result<Self> {
        let value = ensure_finite(value)?;
        Ok(Measurement { value, units, display_units: None })
    }

    /// Simplify `units` against `table`, then wrap
    pub(crate) fn build(value: f64, units: DimensionTable, table: &ConversionTable) -> Result<Self> {
        let value = ensure_finite(value)?;
        let (value, units) = simplify(value, units, table)?;
        Self::from_parts(value, units)
    }

    /// Create a measurement from a value and a unit expression
    pub fn new(value: f64, units: &str) -> Result<Self> {
        ConversionRegistry::global().measurement(value, units)
    }

    /// Parse text such as "6 1/8 in" or "9.81 m/s²"
    pub fn parse(text: &str) -> Result<Self> {
        ConversionRegistry::global().parse(text)
    }

    /// The zero sentinel: converts to any unit as zero
    pub fn zero() -> Self {
        Measurement {
            value: 0.0,
            units: DimensionTable::zero_sentinel(),
            display_units: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> &DimensionTable {
        &self.units
    }

    /// Canonical ASCII unit string, e.g. `lb/in^2`
    pub fn unit_string(&self) -> String {
        self.units.canonical()
    }

    pub fn display_units(&self) -> Option<&str> {
        self.display_units.as_deref()
    }

    /// Builder: render with `units` instead of the canonical display string
    pub fn with_display_units(mut self, units: impl Into<String>) -> Self {
        self.display_units = Some(units.into());
        self
    }

    /// Check if this is the zero sentinel
    pub fn is_zero(&self) -> bool {
        self.value == 0.0 && self.units.is_zero_sentinel()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.units.is_empty()
    }

    /// Storage format: `"<value> <canonical units>"`, always re-parseable
    pub fn to_storage_string(&self) -> String {
        if self.units.is_empty() {
            format!("{} 1", self.value)
        } else {
            format!("{} {}", self.value, self.units.canonical())
        }
    }

    // ========== Conversion ==========

    /// Convert to `units`, failing if the dimension tables cannot be aligned
    pub fn convert_to(&self, units: &str) -> Result<Measurement> {
        ConversionRegistry::global().convert(self, units)
    }

    /// Convert into the units of `other`
    pub fn convert_like(&self, other: &Measurement) -> Result<Measurement> {
        ConversionRegistry::global().convert_like(self, other)
    }

    /// Best-effort conversion; returns an unchanged copy when impossible
    pub fn try_convert(&self, units: &str) -> Result<Measurement> {
        ConversionRegistry::global().try_convert(self, units)
    }

    pub fn can_convert_to(&self, units: &str) -> bool {
        ConversionRegistry::global().can_convert_to(self, units)
    }

    /// Same value, different units (no conversion)
    pub fn force_to(&self, units: &str) -> Result<Measurement> {
        ConversionRegistry::global().measurement(self.value, units)
    }

    /// Expand compound symbols: `(btu/hr)^2` becomes `btu^2/hr^2`
    pub fn strip_parentheses(&self) -> Result<Measurement> {
        ConversionRegistry::global().strip_parentheses(self)
    }

    /// Compare tables, tolerating one global inversion
    pub fn same_units(&self, other: &Measurement) -> bool {
        self.units.same_units(&other.units)
    }

    // ========== Arithmetic ==========

    pub fn add(&self, other: &Measurement) -> Result<Measurement> {
        ConversionRegistry::global().add(self, other)
    }

    pub fn sub(&self, other: &Measurement) -> Result<Measurement> {
        ConversionRegistry::global().sub(self, other)
    }

    pub fn mul(&self, other: &Measurement) -> Result<Measurement> {
        ConversionRegistry::global().mul(self, other)
    }

    pub fn div(&self, other: &Measurement) -> Result<Measurement> {
        ConversionRegistry::global().div(self, other)
    }

    /// Raise to a power; fractional exponents are allowed
    pub fn pow(&self, exponent: f64) -> Result<Measurement> {
        ConversionRegistry::global().pow(self, exponent)
    }

    /// Multiply the value by a plain number
    pub fn scale(&self, factor: f64) -> Result<Measurement> {
        Self::from_parts(self.value * factor, self.units.clone())
    }

    /// Divide the value by a plain number
    pub fn div_scalar(&self, divisor: f64) -> Result<Measurement> {
        Self::from_parts(self.value / divisor, self.units.clone())
    }

    /// `numerator / self`, with inverted units
    pub fn reciprocal_scaled(&self, numerator: f64) -> Result<Measurement> {
        Self::from_parts(numerator / self.value, self.units.inverted())
    }

    /// Round half away from zero to `digits` decimal places
    ///
    /// Precision beyond what `f64` can scale to leaves the value unchanged.
    pub fn round(&self, digits: u32) -> Measurement {
        let rounded = i32::try_from(digits).map(|digits| {
            let factor = 10f64.powi(digits);
            (self.value * factor).round() / factor
        });
        let value = match rounded {
            Ok(rounded) if rounded.is_finite() => rounded,
            _ => self.value,
        };
        Measurement {
            value,
            units: self.units.clone(),
            display_units: self.display_units.clone(),
        }
    }

    pub fn floor(&self) -> Measurement {
        Measurement {
            value: self.value.floor(),
            units: self.units.clone(),
            display_units: None,
        }
    }

    pub fn ceil(&self) -> Measurement {
        Measurement {
            value: self.value.ceil(),
            units: self.units.clone(),
            display_units: None,
        }
    }

    // ========== Comparison ==========

    /// Order two measurements; fails if they cannot share units
    pub fn try_cmp(&self, other: &Measurement) -> Result<Ordering> {
        ConversionRegistry::global().compare(self, other)
    }

    pub fn lt(&self, other: &Measurement) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    pub fn le(&self, other: &Measurement) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Greater)
    }

    pub fn gt(&self, other: &Measurement) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    pub fn ge(&self, other: &Measurement) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }

    /// Equality within a relative tolerance, after conversion
    pub fn approx_eq(&self, other: &Measurement, tolerance: f64) -> bool {
        match ConversionRegistry::global().try_convert_like(other, self) {
            Ok(converted) if converted.units == self.units => {
                let scale = self.value.abs().max(converted.value.abs()).max(1.0);
                (self.value - converted.value).abs() <= tolerance * scale
            }
            _ => false,
        }
    }
}

// ========== Registry-bound construction ==========

impl ConversionRegistry {
    /// Create a measurement, simplifying `units` against this registry
    pub fn measurement(&self, value: f64, units: &str) -> Result<Measurement> {
        let table = parse_units(units)?;
        Measurement::build(value, table, &self.read())
    }

    /// Parse measurement text against this registry
    pub fn parse(&self, text: &str) -> Result<Measurement> {
        let (value, units) = parse_measurement_text(text)?;
        self.measurement(value, &units)
    }

    /// Expand every compound symbol of `m` into its algebraic content
    pub fn strip_parentheses(&self, m: &Measurement) -> Result<Measurement> {
        let mut result = m.clone();
        for (symbol, exp) in m.units.iter() {
            let Some(inner) = symbol.inner_expression() else {
                continue;
            };
            let mut remaining = result.units.clone();
            remaining.remove(symbol.as_str());
            result = Measurement::from_parts(result.value, remaining)?;

            let expanded = self.pow(&self.measurement(1.0, inner)?, exp)?;
            result = self.mul(&result, &expanded)?;
        }
        Ok(result)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = match &self.display_units {
            Some(units) => units.clone(),
            None => display_units(&self.units),
        };
        if units.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, units)
        }
    }
}

impl FromStr for Measurement {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self> {
        Measurement::parse(s)
    }
}

impl PartialEq for Measurement {
    /// Equal when `other`, converted into these units, has the same value
    ///
    /// Incompatible units compare unequal rather than failing.
    fn eq(&self, other: &Self) -> bool {
        ConversionRegistry::global().equals(self, other)
    }
}

impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_storage_string())
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Measurement::parse(&text).map_err(serde::de::Error::custom)
    }
}
