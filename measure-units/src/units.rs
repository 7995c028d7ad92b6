//! Conversion registry - pairwise multipliers and offsets between units
//!
//! Entries are stored once, in the direction they were registered; lookups
//! synthesize the reverse direction. Keys are unit symbols or whole
//! canonical expressions (`m^3`, `in/fin`), compared as plain strings.

use std::collections::HashMap;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Serialize, Deserialize};
use measure_core::{MeasureError, Result};

/// Process-wide registry seeded with the built-in units
pub static REGISTRY: LazyLock<ConversionRegistry> = LazyLock::new(ConversionRegistry::with_builtins);

/// A registry entry as it appears in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionEntry {
    pub from: String,
    pub to: String,
    /// `to = from * multiplier (+ offset)`
    pub multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
}

/// Lookup tables behind the registry lock
#[derive(Debug, Clone, Default)]
pub struct ConversionTable {
    multipliers: HashMap<(String, String), f64>,
    offsets: HashMap<(String, String), f64>,
}

impl ConversionTable {
    fn direct(map: &HashMap<(String, String), f64>, from: &str, to: &str) -> Option<f64> {
        map.get(&(from.to_string(), to.to_string())).copied()
    }

    /// Multiplier taking a quantity in `from` to `to`
    pub fn multiplier(&self, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(1.0);
        }
        if let Some(m) = Self::direct(&self.multipliers, from, to) {
            return Ok(m);
        }
        if let Some(m) = Self::direct(&self.multipliers, to, from) {
            return Ok(1.0 / m);
        }
        Err(MeasureError::unresolved(from, to))
    }

    /// Additive offset applied after the multiplier; zero when none is registered
    pub fn offset(&self, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(0.0);
        }
        if let Some(offset) = Self::direct(&self.offsets, from, to) {
            return Ok(offset);
        }
        if let Some(offset) = Self::direct(&self.offsets, to, from) {
            return Ok(-offset * self.multiplier(from, to)?);
        }
        Ok(0.0)
    }

    /// Check if `from` and `to` are linked by a multiplier
    ///
    /// Exponents must match: `ft^2` never converts to `in^3`.
    pub fn can_convert(&self, from: &str, to: &str, from_exp: f64, to_exp: f64) -> bool {
        if from_exp != to_exp {
            return false;
        }
        if from == to {
            return true;
        }
        self.multipliers.contains_key(&(from.to_string(), to.to_string()))
            || self.multipliers.contains_key(&(to.to_string(), from.to_string()))
    }

    /// `can_convert` at exponent 1
    pub fn convertible(&self, from: &str, to: &str) -> bool {
        self.can_convert(from, to, 1.0, 1.0)
    }

    fn insert_multiplier(&mut self, from: &str, to: &str, multiplier: f64) {
        self.multipliers.insert((from.to_string(), to.to_string()), multiplier);
    }

    fn insert_offset(&mut self, from: &str, to: &str, offset: f64) {
        self.offsets.insert((from.to_string(), to.to_string()), offset);
    }

    pub fn len(&self) -> usize {
        self.multipliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}

/// Thread-safe registry of unit conversions
#[derive(Debug, Default)]
pub struct ConversionRegistry {
    table: RwLock<ConversionTable>,
}

impl ConversionRegistry {
    /// Registry with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry seeded with the built-in length, mass, time, temperature,
    /// power, pressure and volume units
    pub fn with_builtins() -> Self {
        let mut table = ConversionTable::default();
        for &(from, to, multiplier) in BUILTIN_MULTIPLIERS {
            table.insert_multiplier(from, to, multiplier);
        }
        for &(from, to, offset) in BUILTIN_OFFSETS {
            table.insert_offset(from, to, offset);
        }
        ConversionRegistry { table: RwLock::new(table) }
    }

    /// The process-wide registry
    pub fn global() -> &'static ConversionRegistry {
        &REGISTRY
    }

    /// Shared read access for the duration of one operation
    ///
    /// Engine operations take a single guard and pass the table down, so a
    /// registration never interleaves with a half-finished conversion.
    pub fn read(&self) -> RwLockReadGuard<'_, ConversionTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConversionTable> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn multiplier(&self, from: &str, to: &str) -> Result<f64> {
        self.read().multiplier(from, to)
    }

    pub fn offset(&self, from: &str, to: &str) -> Result<f64> {
        self.read().offset(from, to)
    }

    pub fn can_convert(&self, from: &str, to: &str, from_exp: f64, to_exp: f64) -> bool {
        self.read().can_convert(from, to, from_exp, to_exp)
    }

    /// Add or replace the multiplier for `from -> to`
    pub fn register_multiplier(&self, from: &str, to: &str, multiplier: f64) -> bool {
        tracing::debug!(from, to, multiplier, "registering unit multiplier");
        self.write().insert_multiplier(from, to, multiplier);
        true
    }

    /// Add or replace the additive offset for `from -> to`
    pub fn register_offset(&self, from: &str, to: &str, offset: f64) -> bool {
        tracing::debug!(from, to, offset, "registering unit offset");
        self.write().insert_offset(from, to, offset);
        true
    }

    /// Register a batch of entries under one write lock
    pub fn load_entries<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = ConversionEntry>,
    {
        let mut table = self.write();
        let mut count = 0;
        for entry in entries {
            table.insert_multiplier(&entry.from, &entry.to, entry.multiplier);
            if let Some(offset) = entry.offset {
                table.insert_offset(&entry.from, &entry.to, offset);
            }
            count += 1;
        }
        tracing::debug!(count, "loaded conversion entries");
        count
    }
}

// ============ Built-in units ============

const BUILTIN_MULTIPLIERS: &[(&str, &str, f64)] = &[
    // Length
    ("yd", "in", 36.0), ("ft", "in", 12.0), ("m", "in", 39.37008), ("in", "cm", 2.54), ("in", "mm", 25.4),
    ("m", "ft", 3.28084), ("ft", "cm", 30.48), ("ft", "mm", 304.8), ("yd", "ft", 3.0),
    ("m", "cm", 100.0), ("m", "mm", 1000.0), ("m", "yd", 1.093613),
    ("cm", "mm", 10.0), ("yd", "cm", 91.44), ("yd", "mm", 914.4),

    // Mass
    ("kg", "lb", 2.204623), ("lb", "g", 453.5924), ("kg", "g", 1000.0),

    // Time
    ("hr", "min", 60.0), ("min", "s", 60.0), ("hr", "s", 3600.0),

    // Temperature (offsets below)
    ("C", "F", 1.8), ("K", "F", 1.8), ("R", "F", 1.0),
    ("C", "K", 1.0), ("C", "R", 1.8), ("K", "R", 1.8),

    // Power
    ("hp", "W", 745.699872), ("kW", "hp", 1.3410220888), ("TR", "hp", 4.71427994638076), ("hp", "(btu/hr)", 2544.433748),
    ("kW", "W", 1000.0), ("TR", "kW", 3.51685284), ("kW", "(btu/hr)", 3412.142),
    ("TR", "W", 3516.85284), ("W", "(btu/hr)", 3.412142), ("TR", "(btu/hr)", 12000.0),

    // Energy
    ("btu", "J", 1055.0558526), ("btu", "kJ", 1.0550558526), ("kJ", "J", 1000.0),

    // Pressure
    ("bar", "(lb/in^2)", 14.50377), ("bar", "psi", 14.50377), ("bar", "Pa", 100000.0), ("bar", "kPa", 100.0),
    ("atm", "bar", 1.01325), ("bar", "inH2O", 401.46307866177), ("bar", "inHg", 29.530070866),
    ("bar", "mmHg", 750.0638), ("bar", "tor", 750.0638),
    ("inH2O", "Pa", 249.082), ("inH2O", "mmHg", 1.8683201548767), ("inH2O", "tor", 1.8683201548767),
    ("atm", "inH2O", 406.782504600357), ("kPa", "inH2O", 4.0146307866177), ("inHg", "inH2O", 13.595101534864),
    ("psi", "inH2O", 27.679904842545), ("(lb/in^2)", "inH2O", 27.679904842545),
    ("mmHg", "Pa", 133.32239), ("tor", "Pa", 133.32239), ("atm", "Pa", 101325.0), ("kPa", "Pa", 1000.0),
    ("inHg", "Pa", 33386.38866667), ("psi", "Pa", 6894.757), ("(lb/in^2)", "Pa", 6894.757),
    ("mmHg", "tor", 1.0), ("atm", "mmHg", 759.999951996078), ("kPa", "mmHg", 7.500638),
    ("inHg", "mmHg", 25.34), ("psi", "mmHg", 51.71508), ("(lb/in^2)", "mmHg", 51.71508),
    ("atm", "tor", 759.999951996078), ("kPa", "tor", 7.500638), ("inHg", "tor", 25.34),
    ("psi", "tor", 51.71508), ("(lb/in^2)", "tor", 51.71508),
    ("atm", "kPa", 101.325), ("atm", "inHg", 29.8212583001399), ("atm", "psi", 14.69595), ("atm", "(lb/in^2)", 14.69595),
    ("kPa", "inHg", 0.295301), ("psi", "kPa", 6.894757), ("(lb/in^2)", "kPa", 6.894757),
    ("psi", "inHg", 2.03602045718904), ("(lb/in^2)", "inHg", 2.03602045718904),
    ("psi", "(lb/in^2)", 1.0),

    // Fin pitch (whole expressions)
    ("in/fin", "mm/fin", 25.4), ("fin/in", "fin/mm", 1.0 / 25.4),

    // Volume (whole expressions)
    ("m^3", "L", 1000.0), ("ft^3", "L", 28.3168), ("L", "in^3", 61.0237), ("gal", "L", 3.7854),
    ("ft^3", "gal", 7.480543), ("m^3", "gal", 264.1729), ("gal", "in^3", 230.9993),
];

/// Offsets of the affine temperature scales, `to = from * multiplier + offset`
const BUILTIN_OFFSETS: &[(&str, &str, f64)] = &[
    ("C", "F", 32.0),
    ("C", "K", 273.15),
    ("K", "F", -459.67),
    ("R", "F", -459.67),
    ("C", "R", 491.67),
    ("K", "R", 0.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_identity_multiplier() {
        let reg = ConversionRegistry::empty();
        assert_eq!(reg.multiplier("furlong", "furlong").unwrap(), 1.0);
        assert_eq!(reg.offset("furlong", "furlong").unwrap(), 0.0);
    }

    #[test]
    fn test_direct_and_reverse_multiplier() {
        let reg = ConversionRegistry::with_builtins();
        assert_eq!(reg.multiplier("ft", "in").unwrap(), 12.0);
        assert_close(reg.multiplier("in", "ft").unwrap(), 1.0 / 12.0);
    }

    #[test]
    fn test_unresolved_multiplier() {
        let reg = ConversionRegistry::with_builtins();
        let err = reg.multiplier("ft", "kg").unwrap_err();
        assert!(matches!(err, MeasureError::UnresolvedConversion { .. }));
    }

    #[test]
    fn test_offsets() {
        let reg = ConversionRegistry::with_builtins();
        assert_eq!(reg.offset("C", "F").unwrap(), 32.0);
        // F -> C: -32 / 1.8
        assert_close(reg.offset("F", "C").unwrap(), -32.0 / 1.8);
        // Multiplicative-only pairs have no offset
        assert_eq!(reg.offset("ft", "in").unwrap(), 0.0);
    }

    #[test]
    fn test_temperature_round_trip() {
        let reg = ConversionRegistry::with_builtins();
        let to_f = |c: f64| c * reg.multiplier("C", "F").unwrap() + reg.offset("C", "F").unwrap();
        let to_c = |f: f64| f * reg.multiplier("F", "C").unwrap() + reg.offset("F", "C").unwrap();
        assert_close(to_f(100.0), 212.0);
        assert_close(to_c(212.0), 100.0);
        assert_close(to_c(to_f(-40.0)), -40.0);

        let k_to_f = |k: f64| k * reg.multiplier("K", "F").unwrap() + reg.offset("K", "F").unwrap();
        assert_close(k_to_f(273.15), 32.0);
    }

    #[test]
    fn test_can_convert() {
        let reg = ConversionRegistry::with_builtins();
        assert!(reg.can_convert("ft", "in", 1.0, 1.0));
        assert!(reg.can_convert("in", "ft", 2.0, 2.0));
        assert!(!reg.can_convert("in", "ft", 2.0, 1.0));
        assert!(reg.can_convert("widget", "widget", 1.0, 1.0));
        assert!(!reg.can_convert("ft", "kg", 1.0, 1.0));
    }

    #[test]
    fn test_register_overrides() {
        let reg = ConversionRegistry::with_builtins();
        assert!(reg.register_multiplier("ft", "in", 12.5));
        assert_eq!(reg.multiplier("ft", "in").unwrap(), 12.5);

        assert!(reg.register_multiplier("furlong", "ft", 660.0));
        assert_close(reg.multiplier("ft", "furlong").unwrap(), 1.0 / 660.0);

        assert!(reg.register_offset("gauge", "abs", 14.7));
        assert_eq!(reg.offset("gauge", "abs").unwrap(), 14.7);
    }

    #[test]
    fn test_load_entries() {
        let reg = ConversionRegistry::empty();
        let count = reg.load_entries(vec![
            ConversionEntry { from: "mi".into(), to: "ft".into(), multiplier: 5280.0, offset: None },
            ConversionEntry { from: "degA".into(), to: "degB".into(), multiplier: 2.0, offset: Some(10.0) },
        ]);
        assert_eq!(count, 2);
        assert_eq!(reg.multiplier("mi", "ft").unwrap(), 5280.0);
        assert_eq!(reg.offset("degA", "degB").unwrap(), 10.0);
        assert_close(reg.offset("degB", "degA").unwrap(), -5.0);
    }

    #[test]
    fn test_entry_deserializes_without_offset() {
        let json = r#"{"from": "mi", "to": "ft", "multiplier": 5280}"#;
        let entry: ConversionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.offset, None);
        assert_eq!(entry.multiplier, 5280.0);
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let reg = std::sync::Arc::new(ConversionRegistry::with_builtins());
        let writer = {
            let reg = reg.clone();
            std::thread::spawn(move || reg.register_multiplier("league", "mi", 3.0))
        };
        assert_eq!(reg.multiplier("ft", "in").unwrap(), 12.0);
        assert!(writer.join().unwrap());
        assert_eq!(reg.multiplier("league", "mi").unwrap(), 3.0);
    }
}
