//! Data models for the TaxiFare application
//!
//! This module contains the core domain models organized by concern:
//! - Location: validated geographic points
//! - Trip: raw form input and the validated trip request
//! - Fare: prediction outcomes and the quote shown to the user

pub mod fare;
pub mod location;
pub mod trip;

// Re-export all public types for convenient access
pub use fare::{FarePrediction, FareQuote, PredictionOutcome};
pub use location::GeoPoint;
pub use trip::{LocationField, PassengerCount, TripForm, TripRequest};
