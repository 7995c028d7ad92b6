//! Measurement arithmetic and comparison
//!
//! Addition and subtraction convert the right operand into the left
//! operand's units (offsets included). Multiplication and division fold
//! exponents symbol by symbol, rescaling by the registered multiplier when
//! the right operand uses a convertible but different symbol.

use std::cmp::Ordering;
use measure_core::{MeasureError, Result};
use crate::convert::{convert_to, try_convert};
use crate::dimension::DimensionTable;
use crate::measurement::Measurement;
use crate::unit::UnitSymbol;
use crate::units::{ConversionRegistry, ConversionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
    Multiply,
    Divide,
}

impl Fold {
    fn sign(self) -> f64 {
        match self {
            Fold::Multiply => 1.0,
            Fold::Divide => -1.0,
        }
    }
}

fn add(left: &Measurement, right: &Measurement, table: &ConversionTable) -> Result<Measurement> {
    if left.is_zero() {
        return Ok(right.clone());
    }
    let right = convert_to(right, left.units(), table)?;
    Measurement::from_parts(left.value() + right.value(), left.units().clone())
}

fn sub(left: &Measurement, right: &Measurement, table: &ConversionTable) -> Result<Measurement> {
    if left.is_zero() {
        return Measurement::from_parts(-right.value(), right.units().clone());
    }
    let right = convert_to(right, left.units(), table)?;
    Measurement::from_parts(left.value() - right.value(), left.units().clone())
}

/// Shared body of multiplication and division
fn fold(left: &Measurement, right: &Measurement, op: Fold, table: &ConversionTable) -> Result<Measurement> {
    match (left.is_zero(), right.is_zero(), op) {
        (_, true, Fold::Divide) => return Err(MeasureError::invalid("division by zero")),
        (true, _, _) | (_, true, Fold::Multiply) => return Ok(Measurement::zero()),
        _ => {}
    }

    let sign = op.sign();
    let mut value = match op {
        Fold::Multiply => left.value() * right.value(),
        Fold::Divide => left.value() / right.value(),
    };
    let mut remaining = right.units().clone();
    let mut result = DimensionTable::new();

    for (symbol, exp) in left.units().iter() {
        let mut folded = remaining.remove(symbol.as_str()).unwrap_or(0.0);
        let partners: Vec<UnitSymbol> = remaining
            .symbols()
            .filter(|other| table.convertible(other.as_str(), symbol.as_str()))
            .cloned()
            .collect();
        for other in partners {
            let other_exp = remaining.remove(other.as_str()).unwrap_or(0.0);
            value *= table.multiplier(other.as_str(), symbol.as_str())?.powf(sign * other_exp);
            folded += other_exp;
        }
        result.accumulate(symbol.clone(), exp + sign * folded);
    }
    for (symbol, exp) in remaining.iter() {
        result.accumulate(symbol.clone(), sign * exp);
    }

    tracing::trace!(op = ?op, left = %left.units(), right = %right.units(), result = %result, "folded units");
    Measurement::build(value, result, table)
}

fn pow(m: &Measurement, exponent: f64, table: &ConversionTable) -> Result<Measurement> {
    if m.is_zero() {
        return Ok(m.clone());
    }
    if !exponent.is_finite() {
        return Err(MeasureError::invalid(format!("invalid exponent: {}", exponent)));
    }
    Measurement::build(m.value().powf(exponent), m.units().scaled(exponent), table)
}

fn equals(left: &Measurement, right: &Measurement, table: &ConversionTable) -> bool {
    if left.is_zero() || right.is_zero() {
        return left.value() == 0.0 && right.value() == 0.0;
    }
    match try_convert(right, left.units(), table, true) {
        Ok(converted) => {
            left.value() == converted.value() && left.units().same_units(converted.units())
        }
        Err(_) => false,
    }
}

fn compare(left: &Measurement, right: &Measurement, table: &ConversionTable) -> Result<Ordering> {
    let (lhs, rhs) = if left.is_zero() {
        (0.0, right.value())
    } else {
        (left.value(), convert_to(right, left.units(), table)?.value())
    };
    Ok(lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal))
}

impl ConversionRegistry {
    /// `left + right`, in the units of `left`
    pub fn add(&self, left: &Measurement, right: &Measurement) -> Result<Measurement> {
        add(left, right, &self.read())
    }

    /// `left - right`, in the units of `left`
    pub fn sub(&self, left: &Measurement, right: &Measurement) -> Result<Measurement> {
        sub(left, right, &self.read())
    }

    pub fn mul(&self, left: &Measurement, right: &Measurement) -> Result<Measurement> {
        fold(left, right, Fold::Multiply, &self.read())
    }

    pub fn div(&self, left: &Measurement, right: &Measurement) -> Result<Measurement> {
        fold(left, right, Fold::Divide, &self.read())
    }

    pub fn pow(&self, m: &Measurement, exponent: f64) -> Result<Measurement> {
        pow(m, exponent, &self.read())
    }

    /// Value equality after converting `right` into the units of `left`
    pub fn equals(&self, left: &Measurement, right: &Measurement) -> bool {
        equals(left, right, &self.read())
    }

    /// Order after converting `right` into the units of `left`
    pub fn compare(&self, left: &Measurement, right: &Measurement) -> Result<Ordering> {
        compare(left, right, &self.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use measure_core::codes;

    fn m(reg: &ConversionRegistry, text: &str) -> Measurement {
        reg.parse(text).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_add_converts_right_operand() {
        let reg = ConversionRegistry::with_builtins();
        let sum = reg.add(&m(&reg, "2 ft"), &m(&reg, "6 in")).unwrap();
        assert_close(sum.value(), 2.5);
        assert_eq!(sum.unit_string(), "ft");
    }

    #[test]
    fn test_add_incompatible() {
        let reg = ConversionRegistry::with_builtins();
        let err = reg.add(&m(&reg, "2 ft"), &m(&reg, "3 s")).unwrap_err();
        assert_eq!(err.code(), codes::INCOMPATIBLE_UNITS);
    }

    #[test]
    fn test_sub() {
        let reg = ConversionRegistry::with_builtins();
        let diff = reg.sub(&m(&reg, "1 hr"), &m(&reg, "30 min")).unwrap();
        assert_close(diff.value(), 0.5);
        assert_eq!(diff.unit_string(), "hr");
    }

    #[test]
    fn test_zero_identity() {
        let reg = ConversionRegistry::with_builtins();
        let zero = Measurement::zero();
        let x = m(&reg, "3 kg");

        let sum = reg.add(&zero, &x).unwrap();
        assert_eq!(sum.value(), 3.0);
        assert_eq!(sum.unit_string(), "kg");

        let sum = reg.add(&x, &zero).unwrap();
        assert_eq!(sum.value(), 3.0);
        assert_eq!(sum.unit_string(), "kg");

        let diff = reg.sub(&zero, &x).unwrap();
        assert_eq!(diff.value(), -3.0);
        assert_eq!(diff.unit_string(), "kg");
    }

    #[test]
    fn test_mul_unrelated() {
        let reg = ConversionRegistry::with_builtins();
        let product = reg.mul(&m(&reg, "10 m"), &m(&reg, "5 s")).unwrap();
        assert_eq!(product.value(), 50.0);
        assert_eq!(product.unit_string(), "m*s");
    }

    #[test]
    fn test_mul_folds_convertible_symbols() {
        let reg = ConversionRegistry::with_builtins();
        // 2 ft * 6 in = 1 ft^2
        let product = reg.mul(&m(&reg, "2 ft"), &m(&reg, "6 in")).unwrap();
        assert_close(product.value(), 1.0);
        assert_eq!(product.unit_string(), "ft^2");
    }

    #[test]
    fn test_div_to_scalar() {
        let reg = ConversionRegistry::with_builtins();
        let ratio = reg.div(&m(&reg, "3 ft"), &m(&reg, "6 in")).unwrap();
        assert!(ratio.units().is_empty());
        assert_close(ratio.value(), 6.0);
    }

    #[test]
    fn test_div_mixed() {
        let reg = ConversionRegistry::with_builtins();
        // 120 ft / 2 min = 1 ft/s
        let speed = reg.div(&m(&reg, "120 ft"), &m(&reg, "2 min")).unwrap();
        assert_eq!(speed.unit_string(), "ft/min");
        assert_eq!(speed.value(), 60.0);

        let per_second = reg.div(&m(&reg, "120 ft*s"), &m(&reg, "2 min")).unwrap();
        assert_eq!(per_second.unit_string(), "ft");
        assert_close(per_second.value(), 1.0);
    }

    #[test]
    fn test_div_by_zero() {
        let reg = ConversionRegistry::with_builtins();
        let err = reg.div(&m(&reg, "1 m"), &m(&reg, "0 s")).unwrap_err();
        assert_eq!(err.code(), codes::INVALID_MEASUREMENT);
        assert!(reg.div(&m(&reg, "1 m"), &Measurement::zero()).is_err());
    }

    #[test]
    fn test_pow() {
        let reg = ConversionRegistry::with_builtins();
        let area = reg.pow(&m(&reg, "3 m"), 2.0).unwrap();
        assert_eq!(area.value(), 9.0);
        assert_eq!(area.unit_string(), "m^2");

        let root = reg.pow(&m(&reg, "16 m^2"), 0.5).unwrap();
        assert_eq!(root.value(), 4.0);
        assert_eq!(root.unit_string(), "m");

        assert!(reg.pow(&m(&reg, "-8 m"), 0.5).is_err());
        assert!(reg.pow(&Measurement::zero(), 3.0).unwrap().is_zero());
    }

    #[test]
    fn test_equality_converts() {
        let reg = ConversionRegistry::with_builtins();
        assert!(reg.equals(&m(&reg, "24 in"), &m(&reg, "2 ft")));
        assert!(!reg.equals(&m(&reg, "25 in"), &m(&reg, "2 ft")));
        assert!(!reg.equals(&m(&reg, "2 ft"), &m(&reg, "2 s")));
        assert!(reg.equals(&Measurement::zero(), &m(&reg, "0 m")));
    }

    #[test]
    fn test_compare() {
        let reg = ConversionRegistry::with_builtins();
        let inches = m(&reg, "12 in");
        assert_eq!(reg.compare(&inches, &m(&reg, "0.5 ft")).unwrap(), Ordering::Greater);
        assert_eq!(reg.compare(&inches, &m(&reg, "1 ft")).unwrap(), Ordering::Equal);
        assert_eq!(reg.compare(&inches, &m(&reg, "1 yd")).unwrap(), Ordering::Less);

        let err = reg.compare(&inches, &m(&reg, "1 lb")).unwrap_err();
        assert_eq!(err.code(), codes::INCOMPATIBLE_UNITS);
    }

    #[test]
    fn test_compare_temperatures() {
        let reg = ConversionRegistry::with_builtins();
        assert_eq!(reg.compare(&m(&reg, "100 C"), &m(&reg, "200 F")).unwrap(), Ordering::Greater);
    }
}
