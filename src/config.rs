//! Configuration management for `TaxiFare` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TaxiFareError;
use crate::timestamp::parse_zone;
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TaxiFare` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxiFareConfig {
    /// Fare prediction service
    pub prediction: PredictionConfig,
    /// Geocoding service
    pub geocoding: GeocodingConfig,
    /// Trip form defaults
    pub trip: TripConfig,
    /// Map rendering
    pub map: MapConfig,
    /// HTTP server for the web form
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Fare prediction service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Base URL; `/predict` is appended
    #[serde(default = "default_prediction_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_prediction_timeout")]
    pub timeout_seconds: u32,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL; `/search` is appended
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
    /// Nominatim requires an identifying user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Trip form defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripConfig {
    /// IANA zone in which form dates and times are interpreted
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_pickup_latitude")]
    pub pickup_latitude: String,
    #[serde(default = "default_pickup_longitude")]
    pub pickup_longitude: String,
    #[serde(default = "default_dropoff_latitude")]
    pub dropoff_latitude: String,
    #[serde(default = "default_dropoff_longitude")]
    pub dropoff_longitude: String,
}

/// Map rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_zoom")]
    pub zoom: u8,
}

/// Web form server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_prediction_base_url() -> String {
    "https://taxifare-nourhenekr-lgc6lf6tua-ew.a.run.app".to_string()
}

fn default_prediction_timeout() -> u32 {
    30
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("TaxiFare/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_pickup_latitude() -> String {
    "40.783282".to_string()
}

fn default_pickup_longitude() -> String {
    "-73.950655".to_string()
}

fn default_dropoff_latitude() -> String {
    "40.769802".to_string()
}

fn default_dropoff_longitude() -> String {
    "-73.984365".to_string()
}

fn default_map_zoom() -> u8 {
    crate::map::DEFAULT_ZOOM
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            base_url: default_prediction_base_url(),
            timeout_seconds: default_prediction_timeout(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_geocoding_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            pickup_latitude: default_pickup_latitude(),
            pickup_longitude: default_pickup_longitude(),
            dropoff_latitude: default_dropoff_latitude(),
            dropoff_longitude: default_dropoff_longitude(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: default_map_zoom(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TaxiFareConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TAXIFARE_PREDICTION__BASE_URL -> prediction.base_url
        builder = builder.add_source(
            Environment::with_prefix("TAXIFARE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TaxiFareConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taxifare").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.prediction.base_url.is_empty() {
            self.prediction.base_url = default_prediction_base_url();
        }
        if self.prediction.timeout_seconds == 0 {
            self.prediction.timeout_seconds = default_prediction_timeout();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.trip.timezone.is_empty() {
            self.trip.timezone = default_timezone();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Zone in which form input is interpreted
    pub fn timezone(&self) -> Result<Tz> {
        parse_zone(&self.trip.timezone).map_err(|_| {
            anyhow::Error::from(TaxiFareError::config(format!(
                "Unknown timezone '{}'",
                self.trip.timezone
            )))
        })
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Prediction", &self.prediction.base_url),
            ("Geocoding", &self.geocoding.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TaxiFareError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.prediction.timeout_seconds > 300 {
            return Err(
                TaxiFareError::config("Prediction timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.geocoding.timeout_seconds > 300 {
            return Err(
                TaxiFareError::config("Geocoding timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(1..=19).contains(&self.map.zoom) {
            return Err(TaxiFareError::config("Map zoom must be between 1 and 19").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TaxiFareError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TaxiFareError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        self.timezone()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TaxiFareConfig::default();
        assert_eq!(
            config.geocoding.base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.prediction.timeout_seconds, 30);
        assert_eq!(config.trip.timezone, "UTC");
        assert_eq!(config.map.zoom, crate::map::DEFAULT_ZOOM);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TaxiFareConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TaxiFareConfig::default();
        config.prediction.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = TaxiFareConfig::default();
        config.map.zoom = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = TaxiFareConfig::default();
        config.prediction.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_unknown_timezone() {
        let mut config = TaxiFareConfig::default();
        config.trip.timezone = "Nowhere/Special".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown timezone"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = TaxiFareConfig::default();
        config.prediction.base_url.clear();
        config.trip.timezone.clear();
        config.apply_defaults();
        assert!(config.prediction.base_url.starts_with("https://"));
        assert_eq!(config.trip.timezone, "UTC");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[prediction]
base_url = "http://localhost:8000"

[trip]
timezone = "America/New_York"

[map]
zoom = 14
"#
        )
        .unwrap();

        let config = TaxiFareConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.prediction.base_url, "http://localhost:8000");
        assert_eq!(config.prediction.timeout_seconds, 30);
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
        assert_eq!(config.map.zoom, 14);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_missing_zoom_matches_map_default() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9090
"#
        )
        .unwrap();

        let config = TaxiFareConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.map.zoom, crate::map::DEFAULT_ZOOM);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TaxiFareConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("taxifare"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
