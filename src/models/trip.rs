//! Trip form input and the validated trip request built from it

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::{Result, TaxiFareError};

pub const MIN_PASSENGERS: u8 = 1;
pub const MAX_PASSENGERS: u8 = 5;

/// One endpoint of the trip as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LocationField {
    /// Manually entered coordinates, still unvalidated
    Coordinates { latitude: String, longitude: String },
    /// Free-text address to be geocoded
    Address { address: String },
}

impl LocationField {
    pub fn coordinates(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self::Coordinates {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    pub fn address(address: impl Into<String>) -> Self {
        Self::Address {
            address: address.into(),
        }
    }
}

/// Raw values of the trip form, passed explicitly to every action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripForm {
    pub date: NaiveDate,
    #[serde(with = "time_format")]
    pub time: NaiveTime,
    pub pickup: LocationField,
    pub dropoff: LocationField,
    pub passenger_count: i64,
}

/// Number of passengers, bounded to 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct PassengerCount(u8);

impl PassengerCount {
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for PassengerCount {
    type Error = TaxiFareError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .ok()
            .filter(|count| (MIN_PASSENGERS..=MAX_PASSENGERS).contains(count))
            .map(Self)
            .ok_or_else(|| {
                TaxiFareError::validation(format!(
                    "Passenger count must be between {MIN_PASSENGERS} and {MAX_PASSENGERS}, got: {value}"
                ))
            })
    }
}

impl From<PassengerCount> for u8 {
    fn from(count: PassengerCount) -> Self {
        count.0
    }
}

/// Fully validated trip, ready for a single prediction call
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub passenger_count: PassengerCount,
}

/// Accepts both `HH:MM` (browser time inputs) and `HH:MM:SS`
mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(D::Error::custom)
    }
}

/// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| TaxiFareError::validation(format!("Invalid time '{raw}', expected HH:MM")))
}
