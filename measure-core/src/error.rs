//! Structured errors for measurement parsing, conversion and comparison
//!
//! Errors are plain values. Every variant carries a machine-readable code
//! and, where one exists, a hint for fixing the input.

use crate::NumberError;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_MEASUREMENT: &str = "INVALID_MEASUREMENT";
    pub const UNRESOLVED_CONVERSION: &str = "UNRESOLVED_CONVERSION";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
}

pub type Result<T> = std::result::Result<T, MeasureError>;

/// Error type for every fallible measurement operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// Malformed input text, non-finite value or malformed unit grammar
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// No direct or reverse registry entry links the two symbols
    #[error("no unit multiplier registered for {from} to {to}")]
    UnresolvedConversion { from: String, to: String },

    /// Dimension tables could not be aligned
    #[error("cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },
}

impl MeasureError {
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidMeasurement(details.into())
    }

    pub fn unresolved(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnresolvedConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IncompatibleUnits {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMeasurement(_) => codes::INVALID_MEASUREMENT,
            Self::UnresolvedConversion { .. } => codes::UNRESOLVED_CONVERSION,
            Self::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidMeasurement(_) => {
                Some("Use \"<value> <units>\", e.g. \"6 1/8 in\" or \"9.81 m/s^2\"")
            }
            Self::UnresolvedConversion { .. } => {
                Some("Register a multiplier for the unit pair before converting")
            }
            Self::IncompatibleUnits { .. } => None,
        }
    }
}

impl From<NumberError> for MeasureError {
    fn from(err: NumberError) -> Self {
        Self::InvalidMeasurement(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(MeasureError::invalid("x").code(), codes::INVALID_MEASUREMENT);
        assert_eq!(MeasureError::unresolved("a", "b").code(), codes::UNRESOLVED_CONVERSION);
        assert_eq!(MeasureError::incompatible("a", "b").code(), codes::INCOMPATIBLE_UNITS);
    }

    #[test]
    fn test_display() {
        let err = MeasureError::incompatible("m", "s");
        assert_eq!(err.to_string(), "cannot convert m to s");

        let err = MeasureError::unresolved("ft", "kg");
        assert!(err.to_string().contains("ft to kg"));
    }

    #[test]
    fn test_from_number_error() {
        let err: MeasureError = NumberError::NotANumber("1 2 3 4".to_string()).into();
        assert!(matches!(err, MeasureError::InvalidMeasurement(_)));
        assert!(err.to_string().contains("1 2 3 4"));
        assert!(err.suggestion().is_some());
    }
}
