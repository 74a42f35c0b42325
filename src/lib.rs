//! `TaxiFare` - taxi fare estimation backed by a remote prediction service
//!
//! This library validates trip form input, resolves addresses through a
//! geocoding service, normalizes pickup times to UTC and asks the fare
//! prediction service for an estimate.

pub mod api;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod logging;
pub mod map;
pub mod models;
pub mod orchestrator;
pub mod prediction;
pub mod timestamp;
pub mod validation;
pub mod web;

// Re-export core types for public API
pub use config::TaxiFareConfig;
pub use error::{ErrorKind, TaxiFareError};
pub use geocoding::{GeocodeResult, Geocoder, NominatimGeocoder};
pub use map::MapView;
pub use models::{
    FarePrediction, FareQuote, GeoPoint, LocationField, PassengerCount, PredictionOutcome,
    TripForm, TripRequest,
};
pub use orchestrator::{FareRequestOrchestrator, TripPreview};
pub use prediction::{FarePredictionClient, FarePredictor};
pub use timestamp::to_utc_string;
pub use validation::is_valid_number;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TaxiFareError>;
