//! Geocoding client
//!
//! Resolves free-text addresses to coordinates through a Nominatim-compatible
//! `/search` endpoint. Every failure collapses into [`GeocodeResult::NotFound`];
//! callers never see an error from this module.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::TaxiFareError;
use crate::config::GeocodingConfig;
use crate::models::GeoPoint;

/// Result of a single address lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeResult {
    Found(GeoPoint),
    NotFound,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> GeocodeResult;
}

/// Geocoder backed by the Nominatim search API
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TaxiFareError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn lookup(&self, address: &str) -> std::result::Result<Option<GeoPoint>, String> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let results: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| format!("undecodable response: {e}"))?;

        let Some(place) = results.into_iter().next() else {
            return Ok(None);
        };

        place.to_point().map(Some)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> GeocodeResult {
        let address = address.trim();
        if address.is_empty() {
            debug!("Empty address, skipping lookup");
            return GeocodeResult::NotFound;
        }

        let start_time = Instant::now();
        match self.lookup(address).await {
            Ok(Some(point)) => {
                info!(
                    "Geocoded '{}' to ({:.6}, {:.6}) in {:.3}s",
                    address,
                    point.latitude,
                    point.longitude,
                    start_time.elapsed().as_secs_f64()
                );
                GeocodeResult::Found(point)
            }
            Ok(None) => {
                warn!("No results found for address '{}'", address);
                GeocodeResult::NotFound
            }
            Err(reason) => {
                warn!("Geocoding '{}' failed: {}", address, reason);
                GeocodeResult::NotFound
            }
        }
    }
}

/// Raw Nominatim search hit; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimPlace {
    fn to_point(&self) -> std::result::Result<GeoPoint, String> {
        let latitude: f64 = self
            .lat
            .parse()
            .map_err(|_| format!("invalid latitude '{}'", self.lat))?;
        let longitude: f64 = self
            .lon
            .parse()
            .map_err(|_| format!("invalid longitude '{}'", self.lon))?;
        if let Some(name) = &self.display_name {
            debug!("Matched place: {}", name);
        }
        GeoPoint::new(latitude, longitude).map_err(|e| e.to_string())
    }
}
