//! Fare request orchestration
//!
//! The two user actions, "validate trip" and "compute fare", as plain async
//! functions over an explicit [`TripForm`]. Local checks finish before the
//! first geocoding request, and geocoding finishes before any prediction
//! request is issued.

use std::sync::Arc;

use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::TaxiFareConfig;
use crate::geocoding::{GeocodeResult, Geocoder, NominatimGeocoder};
use crate::map::MapView;
use crate::models::{FareQuote, GeoPoint, LocationField, PassengerCount, TripForm, TripRequest};
use crate::prediction::{FarePredictionClient, FarePredictor};
use crate::timestamp::{parse_zone, to_utc_string};
use crate::{Result, TaxiFareError};

/// Result of the "validate trip" action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPreview {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub map: MapView,
}

pub struct FareRequestOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    predictor: Arc<dyn FarePredictor>,
    timezone: Tz,
    map_zoom: u8,
}

impl std::fmt::Debug for FareRequestOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FareRequestOrchestrator")
            .field("timezone", &self.timezone)
            .field("map_zoom", &self.map_zoom)
            .finish_non_exhaustive()
    }
}

impl FareRequestOrchestrator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        predictor: Arc<dyn FarePredictor>,
        timezone: Tz,
        map_zoom: u8,
    ) -> Self {
        Self {
            geocoder,
            predictor,
            timezone,
            map_zoom,
        }
    }

    /// Wire up the HTTP-backed collaborators described by `config`
    pub fn from_config(config: &TaxiFareConfig) -> Result<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoding)?;
        let predictor = FarePredictionClient::new(&config.prediction)?;
        let timezone = parse_zone(&config.trip.timezone)
            .map_err(|e| TaxiFareError::config(e.to_string()))?;
        Ok(Self::new(
            Arc::new(geocoder),
            Arc::new(predictor),
            timezone,
            config.map.zoom,
        ))
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Turn one form endpoint into a point, geocoding addresses
    pub async fn resolve(&self, label: &str, field: &LocationField) -> Result<GeoPoint> {
        let endpoint = check_endpoint(label, field)?;
        self.locate(endpoint).await
    }

    async fn locate(&self, endpoint: CheckedEndpoint<'_>) -> Result<GeoPoint> {
        match endpoint {
            CheckedEndpoint::Point(point) => Ok(point),
            CheckedEndpoint::Address(address) => match self.geocoder.geocode(address).await {
                GeocodeResult::Found(point) => Ok(point),
                GeocodeResult::NotFound => Err(TaxiFareError::not_found(address)),
            },
        }
    }

    async fn locate_endpoints(
        &self,
        pickup: CheckedEndpoint<'_>,
        dropoff: CheckedEndpoint<'_>,
    ) -> Result<(GeoPoint, GeoPoint)> {
        let pickup = self.locate(pickup).await?;
        let dropoff = self.locate(dropoff).await?;
        debug!(
            "Resolved trip {} -> {}",
            pickup.format_coordinates(),
            dropoff.format_coordinates()
        );
        Ok((pickup, dropoff))
    }

    /// "Validate trip": resolve both endpoints and build the map
    #[instrument(skip(self, form))]
    pub async fn validate_trip(&self, form: &TripForm) -> Result<TripPreview> {
        let (pickup, dropoff) = check_endpoints(form)?;
        let (pickup, dropoff) = self.locate_endpoints(pickup, dropoff).await?;
        let map = MapView::for_trip(pickup, dropoff, self.map_zoom);
        info!("Trip validated ({:.2} km straight line)", map.distance_km);
        Ok(TripPreview {
            pickup,
            dropoff,
            map,
        })
    }

    /// "Compute fare": resolve, normalize the timestamp and ask for a prediction
    ///
    /// Passenger count, manual coordinates, blank addresses and the local time
    /// are all checked before the first geocoding request.
    #[instrument(skip(self, form))]
    pub async fn compute_fare(&self, form: &TripForm) -> Result<FareQuote> {
        let passenger_count = PassengerCount::try_from(form.passenger_count)?;
        let (pickup, dropoff) = check_endpoints(form)?;
        let pickup_datetime = to_utc_string(form.date, form.time, self.timezone)?;

        let (pickup, dropoff) = self.locate_endpoints(pickup, dropoff).await?;
        let request = TripRequest {
            pickup,
            dropoff,
            pickup_date: form.date,
            pickup_time: form.time,
            passenger_count,
        };

        let prediction = self
            .predictor
            .predict(
                &pickup_datetime,
                request.pickup,
                request.dropoff,
                request.passenger_count,
            )
            .await?;

        Ok(FareQuote {
            pickup_datetime,
            pickup: request.pickup,
            dropoff: request.dropoff,
            passenger_count: request.passenger_count,
            prediction,
        })
    }
}

/// A form endpoint that passed the local checks
#[derive(Debug, Clone, Copy, PartialEq)]
enum CheckedEndpoint<'a> {
    Point(GeoPoint),
    /// Trimmed, non-empty address still to be geocoded
    Address(&'a str),
}

fn check_endpoint<'a>(label: &str, field: &'a LocationField) -> Result<CheckedEndpoint<'a>> {
    match field {
        LocationField::Coordinates {
            latitude,
            longitude,
        } => GeoPoint::from_strings(label, latitude, longitude).map(CheckedEndpoint::Point),
        LocationField::Address { address } => {
            let address = address.trim();
            if address.is_empty() {
                return Err(TaxiFareError::validation(format!(
                    "{label} address is required. Please fill in all input fields"
                )));
            }
            Ok(CheckedEndpoint::Address(address))
        }
    }
}

fn check_endpoints(form: &TripForm) -> Result<(CheckedEndpoint<'_>, CheckedEndpoint<'_>)> {
    let pickup = check_endpoint("pickup", &form.pickup)?;
    let dropoff = check_endpoint("dropoff", &form.dropoff)?;
    Ok((pickup, dropoff))
}
