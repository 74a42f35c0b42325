//! Normalization of the form's wall-clock date and time into a UTC string
//!
//! Form input is always interpreted in an explicit IANA zone (configured via
//! `trip.timezone`, `UTC` by default), never in the host's local zone.

use chrono::{LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{Result, TaxiFareError};

/// Wire format expected by the prediction service
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an IANA zone name such as `America/New_York`
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TaxiFareError::validation(format!("Unknown timezone '{name}'")))
}

/// Combine `date` and `time` as wall-clock time in `zone` and format the UTC instant.
///
/// Times skipped by a DST transition are rejected; repeated times resolve to
/// the earlier instant.
pub fn to_utc_string(date: NaiveDate, time: NaiveTime, zone: Tz) -> Result<String> {
    let local = NaiveDateTime::new(date, time);
    let instant = match zone.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => {
            tracing::debug!(%local, %zone, "Ambiguous local time, using the earlier instant");
            earliest
        }
        LocalResult::None => {
            return Err(TaxiFareError::validation(format!(
                "{local} does not exist in timezone {zone}"
            )));
        }
    };

    Ok(instant.with_timezone(&Utc).format(UTC_FORMAT).to_string())
}

/// Parse a string produced by [`to_utc_string`] and re-localize it into `zone`
pub fn from_utc_string(value: &str, zone: Tz) -> Result<NaiveDateTime> {
    let utc = NaiveDateTime::parse_from_str(value, UTC_FORMAT)
        .map_err(|e| TaxiFareError::parse(format!("Invalid UTC timestamp '{value}': {e}")))?;
    Ok(Utc.from_utc_datetime(&utc).with_timezone(&zone).naive_local())
}
