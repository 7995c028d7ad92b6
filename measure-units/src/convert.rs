//! Conversion between dimension tables
//!
//! Strategy, first match wins:
//! 1. the zero sentinel becomes zero in the target units
//! 2. tables of different sizes never convert
//! 3. a registry entry for the whole canonical expression (`m^3` -> `gal`)
//! 4. the same, for the inverted source (`in/fin` -> `fin/in`)
//! 5. symbol-by-symbol pairing with equal exponents
//!
//! A failed attempt hands back the source unchanged; [`convert_to`] turns
//! that into an error.

use measure_core::{MeasureError, Result};
use crate::dimension::DimensionTable;
use crate::measurement::Measurement;
use crate::parse::parse_units;
use crate::units::{ConversionRegistry, ConversionTable};

/// Best-effort conversion of `source` into `target`
///
/// Offsets are added only when `offsets` is set and the whole expression
/// converts in one step.
pub(crate) fn try_convert(
    source: &Measurement,
    target: &DimensionTable,
    table: &ConversionTable,
    offsets: bool,
) -> Result<Measurement> {
    if source.is_zero() {
        return Measurement::from_parts(0.0, target.clone());
    }
    if source.units().len() != target.len() {
        tracing::debug!(from = %source.units(), to = %target, "dimension tables differ in size");
        return Ok(source.clone());
    }

    let from = source.units().canonical();
    let to = target.canonical();
    if table.convertible(&from, &to) {
        tracing::trace!(from = %from, to = %to, "converting whole expression");
        let mut value = source.value() * table.multiplier(&from, &to)?;
        if offsets {
            value += table.offset(&from, &to)?;
        }
        return Measurement::from_parts(value, target.clone());
    }

    let inverted = source.units().inverted().canonical();
    if table.convertible(&inverted, &to) {
        let reciprocal = if source.value() == 0.0 { 0.0 } else { 1.0 / source.value() };
        tracing::trace!(from = %inverted, to = %to, "converting through inverted units");
        return Measurement::from_parts(reciprocal * table.multiplier(&inverted, &to)?, target.clone());
    }

    let mut from_units = source.units().clone();
    let mut to_units = target.clone();
    let mut value = source.value();
    while let Some((from_symbol, to_symbol, exp)) = find_pair(&from_units, &to_units, table) {
        from_units.remove(&from_symbol);
        to_units.remove(&to_symbol);
        value *= table.multiplier(&from_symbol, &to_symbol)?.powf(exp);
        tracing::trace!(from = %from_symbol, to = %to_symbol, exp, "converted symbol");
    }
    if !from_units.is_empty() {
        tracing::debug!(from = %source.units(), to = %target, unmatched = %from_units, "no conversion path");
        return Ok(source.clone());
    }

    Measurement::from_parts(value, target.clone())
}

/// First source symbol (lexical order) with a convertible target partner
fn find_pair(
    from_units: &DimensionTable,
    to_units: &DimensionTable,
    table: &ConversionTable,
) -> Option<(String, String, f64)> {
    for (from, from_exp) in from_units.iter() {
        for (to, to_exp) in to_units.iter() {
            if table.can_convert(from.as_str(), to.as_str(), from_exp, to_exp) {
                return Some((from.to_string(), to.to_string(), to_exp));
            }
        }
    }
    None
}

/// Strict conversion: the result must carry exactly `target`
pub(crate) fn convert_to(
    source: &Measurement,
    target: &DimensionTable,
    table: &ConversionTable,
) -> Result<Measurement> {
    let converted = try_convert(source, target, table, true)?;
    if converted.units() != target {
        return Err(MeasureError::incompatible(source.units().canonical(), target.canonical()));
    }
    Ok(converted)
}

/// Parse and simplify a target unit expression
fn target_units(units: &str, table: &ConversionTable) -> Result<DimensionTable> {
    let target = Measurement::build(1.0, parse_units(units)?, table)?;
    Ok(target.units().clone())
}

impl ConversionRegistry {
    /// Convert `m` into `units`
    pub fn convert(&self, m: &Measurement, units: &str) -> Result<Measurement> {
        let table = self.read();
        convert_to(m, &target_units(units, &table)?, &table)
    }

    /// Convert `m` into the units of `like`
    pub fn convert_like(&self, m: &Measurement, like: &Measurement) -> Result<Measurement> {
        convert_to(m, like.units(), &self.read())
    }

    /// Convert `m` into `units`, or return it unchanged
    pub fn try_convert(&self, m: &Measurement, units: &str) -> Result<Measurement> {
        let table = self.read();
        try_convert(m, &target_units(units, &table)?, &table, true)
    }

    /// Convert `m` into the units of `like`, or return it unchanged
    pub fn try_convert_like(&self, m: &Measurement, like: &Measurement) -> Result<Measurement> {
        try_convert(m, like.units(), &self.read(), true)
    }

    /// Check whether [`ConversionRegistry::convert`] would succeed
    pub fn can_convert_to(&self, m: &Measurement, units: &str) -> bool {
        self.convert(m, units).is_ok()
    }
}
