//! Simplification - collapse convertible symbols in a dimension table
//!
//! `ft*in` becomes `ft^2` with the value rescaled. Only symbols carrying the
//! same exponent merge, so `ft/in` and `ft^2*in` are left as written.
//! Merges repeat until no such pair remains.

use measure_core::Result;
use crate::dimension::DimensionTable;
use crate::unit::UnitSymbol;
use crate::units::ConversionTable;

/// Reduce `units` to a minimal equivalent table, rescaling `value`
pub fn simplify(
    mut value: f64,
    mut units: DimensionTable,
    table: &ConversionTable,
) -> Result<(f64, DimensionTable)> {
    while let Some((keep, merge)) = find_merge(&units, table) {
        let merge_exp = units.remove(merge.as_str()).unwrap_or(0.0);
        // one `merge` unit is 1/multiplier(keep -> merge) of a `keep` unit
        value *= table.multiplier(merge.as_str(), keep.as_str())?.powf(merge_exp);
        units.accumulate(keep.clone(), merge_exp);
        tracing::trace!(keep = %keep, merge = %merge, merge_exp, value, "merged convertible units");
    }
    Ok((value, units))
}

/// First pair of distinct, convertible symbols with equal exponents, in lexical order
fn find_merge(units: &DimensionTable, table: &ConversionTable) -> Option<(UnitSymbol, UnitSymbol)> {
    for (keep, keep_exp) in units.iter() {
        for (merge, merge_exp) in units.iter() {
            if keep != merge && table.can_convert(keep.as_str(), merge.as_str(), keep_exp, merge_exp) {
                return Some((keep.clone(), merge.clone()));
            }
        }
    }
    None
}
