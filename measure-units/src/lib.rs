//! Measure Units - Unit-aware measurements
//!
//! A [`Measurement`] is a value with a dimension table (`lb/in^2` is
//! `{ in: -2, lb: 1 }`). Measurements parse from text, simplify on
//! construction, and convert through a [`ConversionRegistry`].
//!
//! Built-in categories:
//! - Length (in, ft, yd, m, cm, mm)
//! - Mass (lb, kg, g)
//! - Time (hr, min, s)
//! - Temperature (C, F, K, R), with offsets
//! - Power (W, kW, hp, TR, (btu/hr))
//! - Energy (btu, J, kJ)
//! - Pressure (psi, Pa, kPa, bar, atm, inH2O, inHg, mmHg, tor)
//! - Volume (m^3, ft^3, in^3, L, gal)
//! - Fin pitch (in/fin, mm/fin, fin/in, fin/mm)
//!
//! ```
//! use measure_units::Measurement;
//!
//! let length = Measurement::parse("2 ft").unwrap();
//! let total = length.add(&Measurement::parse("6 in").unwrap()).unwrap();
//! assert!((total.value() - 2.5).abs() < 1e-9);
//! assert_eq!(total.unit_string(), "ft");
//! ```

mod dimension;
mod unit;
mod units;
mod parse;
mod simplify;
mod convert;
mod ops;
mod format;
mod measurement;

pub use dimension::DimensionTable;
pub use unit::{UnitSymbol, ZERO_SYMBOL};
pub use units::{ConversionEntry, ConversionRegistry, ConversionTable, REGISTRY};
pub use parse::{normalize_superscripts, parse_measurement_text, parse_units};
pub use simplify::simplify;
pub use format::{display_units, superscript};
pub use measurement::Measurement;

pub use measure_core::{codes, MeasureError, Result};
