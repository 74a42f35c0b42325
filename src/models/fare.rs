//! Fare prediction results

use serde::{Deserialize, Serialize};

use super::{GeoPoint, PassengerCount};

/// Fare returned by the prediction service, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarePrediction {
    pub fare: f64,
}

impl FarePrediction {
    #[must_use]
    pub fn new(raw_fare: f64) -> Self {
        Self {
            fare: (raw_fare * 100.0).round() / 100.0,
        }
    }

    /// Format as the large currency string shown to the user
    #[must_use]
    pub fn format_fare(&self) -> String {
        format!("$ {:.2}", self.fare)
    }
}

/// Outcome of a successful (HTTP 200) prediction call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Fare(FarePrediction),
    /// The response decoded but carried no numeric `fare`
    NoPrediction,
}

impl PredictionOutcome {
    #[must_use]
    pub fn fare(&self) -> Option<FarePrediction> {
        match self {
            PredictionOutcome::Fare(prediction) => Some(*prediction),
            PredictionOutcome::NoPrediction => None,
        }
    }
}

/// Everything the "compute fare" action reports back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    /// Timestamp exactly as sent to the prediction service
    pub pickup_datetime: String,
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub passenger_count: PassengerCount,
    pub prediction: PredictionOutcome,
}

impl FareQuote {
    #[must_use]
    pub fn display(&self) -> String {
        match self.prediction {
            PredictionOutcome::Fare(prediction) => prediction.format_fare(),
            PredictionOutcome::NoPrediction => "No fare prediction available".to_string(),
        }
    }
}
