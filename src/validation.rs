//! Input validation for manually entered form values
//!
//! Addresses resolved through geocoding bypass these checks since the
//! geocoder already returns parsed coordinates.

use std::ops::RangeInclusive;

use crate::{Result, TaxiFareError};

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Report whether `value` is a finite decimal or exponential number literal.
///
/// Surrounding whitespace is ignored. `inf` and `nan` are rejected.
#[must_use]
pub fn is_valid_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|number| number.is_finite())
}

/// Parse a coordinate form field, naming the field in any validation error
pub fn parse_coordinate(field: &str, value: &str, range: &RangeInclusive<f64>) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaxiFareError::validation(format!(
            "{field} is required. Please fill in all input fields"
        )));
    }

    if !is_valid_number(value) {
        return Err(TaxiFareError::validation(format!(
            "{field} '{value}' is not a valid number"
        )));
    }

    let number: f64 = value
        .parse()
        .map_err(|_| TaxiFareError::validation(format!("{field} '{value}' is not a valid number")))?;

    if !range.contains(&number) {
        return Err(TaxiFareError::validation(format!(
            "{field} must be between {} and {}, got: {number}",
            range.start(),
            range.end()
        )));
    }

    Ok(number)
}
