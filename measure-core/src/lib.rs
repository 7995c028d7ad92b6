//! Measure Core - Fundamental types
//!
//! This crate provides the pieces shared by every measure crate:
//! - `MeasureError`: error values with machine-readable codes
//! - `parse_number`: decimals, fractions and mixed numbers as `f64`

mod number;
mod error;

pub use number::{parse_number, ensure_finite, NumberError};
pub use error::{MeasureError, Result, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{MeasureError, Result, parse_number};
    pub use crate::error::codes;
}
