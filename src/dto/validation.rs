//! Validation helpers for request payloads.

use validator::ValidationError;

use crate::schedule::{Interval, parse_weekday};

/// Validates that a weekday is one of the seven English weekday names.
pub fn validate_weekday(value: &str) -> Result<(), ValidationError> {
    parse_weekday(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("weekday");
        err.message = Some(format!("`{value}` is not a weekday").into());
        err
    })
}

/// Validates that an interval is `weekly`, `biweekly`, `monthly` or `custom`.
pub fn validate_interval(value: &str) -> Result<(), ValidationError> {
    value.parse::<Interval>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("interval");
        err.message = Some(format!("`{value}` is not a schedule interval").into());
        err
    })
}

/// Rejects strings made only of whitespace.
///
/// # Examples
///
/// ```ignore
/// validate_not_blank("Dune night") // Ok
/// validate_not_blank("   ")        // Err
/// ```
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}
