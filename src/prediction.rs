//! Fare prediction client
//!
//! Issues the single `GET {base_url}/predict` call for a trip. No retries
//! and no caching: one best-effort request per user action.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::config::PredictionConfig;
use crate::models::{FarePrediction, GeoPoint, PassengerCount, PredictionOutcome};
use crate::{Result, TaxiFareError};

#[async_trait]
pub trait FarePredictor: Send + Sync {
    async fn predict(
        &self,
        pickup_datetime_utc: &str,
        pickup: GeoPoint,
        dropoff: GeoPoint,
        passenger_count: PassengerCount,
    ) -> Result<PredictionOutcome>;
}

/// HTTP client for the fare prediction service
#[derive(Debug, Clone)]
pub struct FarePredictionClient {
    client: Client,
    base_url: String,
}

impl FarePredictionClient {
    pub fn new(config: &PredictionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TaxiFare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TaxiFareError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Query parameters in the order the service documents them
///
/// Coordinates go out in the shortest `f64` form that parses back to the same
/// value, so `"40.7800"` is sent as `40.78`.
fn query_params(
    pickup_datetime_utc: &str,
    pickup: GeoPoint,
    dropoff: GeoPoint,
    passenger_count: PassengerCount,
) -> [(&'static str, String); 6] {
    [
        ("pickup_datetime", pickup_datetime_utc.to_string()),
        ("pickup_longitude", pickup.longitude.to_string()),
        ("pickup_latitude", pickup.latitude.to_string()),
        ("dropoff_longitude", dropoff.longitude.to_string()),
        ("dropoff_latitude", dropoff.latitude.to_string()),
        ("passenger_count", passenger_count.get().to_string()),
    ]
}

/// Interpret a 200 response body
fn parse_prediction_body(body: &str) -> Result<PredictionOutcome> {
    let value: Value = serde_json::from_str(body).map_err(|e| TaxiFareError::parse(e.to_string()))?;

    match value.get("fare").and_then(Value::as_f64) {
        Some(fare) => Ok(PredictionOutcome::Fare(FarePrediction::new(fare))),
        None => {
            warn!("Prediction response has no numeric 'fare' field");
            Ok(PredictionOutcome::NoPrediction)
        }
    }
}

#[async_trait]
impl FarePredictor for FarePredictionClient {
    #[instrument(skip(self), fields(passengers = passenger_count.get()))]
    async fn predict(
        &self,
        pickup_datetime_utc: &str,
        pickup: GeoPoint,
        dropoff: GeoPoint,
        passenger_count: PassengerCount,
    ) -> Result<PredictionOutcome> {
        let url = format!("{}/predict", self.base_url);
        let params = query_params(pickup_datetime_utc, pickup, dropoff, passenger_count);
        debug!("Prediction request: {} {:?}", url, params);

        let start_time = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                error!("Prediction request failed: {}", e);
                TaxiFareError::network(e.to_string())
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Prediction service answered {}", status);
            return Err(TaxiFareError::UpstreamStatus {
                code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TaxiFareError::network(format!("Failed to read response body: {e}")))?;

        let outcome = parse_prediction_body(&body)?;
        info!(
            "Prediction completed in {:.3}s: {:?}",
            start_time.elapsed().as_secs_f64(),
            outcome
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_trip() -> (GeoPoint, GeoPoint, PassengerCount) {
        (
            GeoPoint::new(40.783282, -73.950655).unwrap(),
            GeoPoint::new(40.769802, -73.984365).unwrap(),
            PassengerCount::try_from(1_i64).unwrap(),
        )
    }

    fn client_for(server: &MockServer) -> FarePredictionClient {
        let config = PredictionConfig {
            base_url: server.uri(),
            ..PredictionConfig::default()
        };
        FarePredictionClient::new(&config).unwrap()
    }

    #[rstest]
    #[case(r#"{"fare": 14.2371}"#, Some(14.24))]
    #[case(r#"{"fare": 9}"#, Some(9.0))]
    #[case(r#"{"prediction": 14.2}"#, None)]
    #[case(r#"{"fare": "14.2"}"#, None)]
    #[case(r#"[1, 2]"#, None)]
    fn test_parse_prediction_body(#[case] body: &str, #[case] expected: Option<f64>) {
        let outcome = parse_prediction_body(body).unwrap();
        assert_eq!(outcome.fare().map(|p| p.fare), expected);
    }

    #[test]
    fn test_parse_prediction_body_rejects_garbage() {
        let err = parse_prediction_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, TaxiFareError::Parse { .. }));
    }

    #[test]
    fn test_query_params_use_shortest_float_text() {
        let (pickup, dropoff, passengers) = sample_trip();
        let params = query_params("2024-01-15 14:30:00", pickup, dropoff, passengers);
        assert_eq!(params[1], ("pickup_longitude", "-73.950655".to_string()));
        assert_eq!(params[4], ("dropoff_latitude", "40.769802".to_string()));
        assert_eq!(params[5], ("passenger_count", "1".to_string()));

        let padded = GeoPoint::from_strings("pickup", "40.7800", "-7.395e1").unwrap();
        let params = query_params("2024-01-15 14:30:00", padded, dropoff, passengers);
        assert_eq!(params[1], ("pickup_longitude", "-73.95".to_string()));
        assert_eq!(params[2], ("pickup_latitude", "40.78".to_string()));
    }

    #[tokio::test]
    async fn test_predict_sends_all_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .and(query_param("pickup_datetime", "2024-01-15 14:30:00"))
            .and(query_param("pickup_longitude", "-73.950655"))
            .and(query_param("pickup_latitude", "40.783282"))
            .and(query_param("dropoff_longitude", "-73.984365"))
            .and(query_param("dropoff_latitude", "40.769802"))
            .and(query_param("passenger_count", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"fare": 11.876})))
            .expect(1)
            .mount(&server)
            .await;

        let (pickup, dropoff, passengers) = sample_trip();
        let outcome = client_for(&server)
            .predict("2024-01-15 14:30:00", pickup, dropoff, passengers)
            .await
            .unwrap();
        assert_eq!(outcome, PredictionOutcome::Fare(FarePrediction { fare: 11.88 }));
    }

    #[tokio::test]
    async fn test_predict_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let (pickup, dropoff, passengers) = sample_trip();
        let err = client_for(&server)
            .predict("2024-01-15 14:30:00", pickup, dropoff, passengers)
            .await
            .unwrap_err();
        assert!(matches!(err, TaxiFareError::UpstreamStatus { code: 500 }));
    }

    #[tokio::test]
    async fn test_predict_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fare=12"))
            .mount(&server)
            .await;

        let (pickup, dropoff, passengers) = sample_trip();
        let err = client_for(&server)
            .predict("2024-01-15 14:30:00", pickup, dropoff, passengers)
            .await
            .unwrap_err();
        assert!(matches!(err, TaxiFareError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_predict_missing_fare_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"detail": "ok"})))
            .mount(&server)
            .await;

        let (pickup, dropoff, passengers) = sample_trip();
        let outcome = client_for(&server)
            .predict("2024-01-15 14:30:00", pickup, dropoff, passengers)
            .await
            .unwrap();
        assert_eq!(outcome, PredictionOutcome::NoPrediction);
    }

    #[tokio::test]
    async fn test_predict_network_error() {
        let config = PredictionConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
        };
        let client = FarePredictionClient::new(&config).unwrap();
        let (pickup, dropoff, passengers) = sample_trip();
        let err = client
            .predict("2024-01-15 14:30:00", pickup, dropoff, passengers)
            .await
            .unwrap_err();
        assert!(matches!(err, TaxiFareError::Network { .. }));
    }
}
