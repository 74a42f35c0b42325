//! Integration tests for the TaxiFare CLI

use std::process::{Command, Output};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the binary against the given collaborators, ignoring any user config
fn taxifare(args: &[&str], prediction_url: &str, geocoding_url: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taxifare"))
        .args(["--config", "does-not-exist.toml"])
        .args(args)
        .env("TAXIFARE_PREDICTION__BASE_URL", prediction_url)
        .env("TAXIFARE_GEOCODING__BASE_URL", geocoding_url)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

const UNREACHABLE: &str = "http://127.0.0.1:9";

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_taxifare"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Taxi fare estimation"));
    assert!(stdout.contains("fare"));
    assert!(stdout.contains("validate"));
}

#[test]
fn test_invalid_coordinate_is_rejected() {
    let output = taxifare(
        &["fare", "--date", "2024-01-15", "--time", "14:30", "--pickup-lon", "abc"],
        UNREACHABLE,
        UNREACHABLE,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input"), "got: {stderr}");
    assert!(stderr.contains("pickup longitude"), "got: {stderr}");
}

#[test]
fn test_passenger_count_is_bounded() {
    let output = taxifare(&["fare", "--passengers", "6"], UNREACHABLE, UNREACHABLE);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Passenger count"), "got: {stderr}");
}

#[test]
fn test_validate_with_coordinates_needs_no_network() {
    let output = taxifare(
        &[
            "validate",
            "--pickup-lat",
            "40.783282",
            "--pickup-lon",
            "-73.950655",
            "--geojson",
        ],
        UNREACHABLE,
        UNREACHABLE,
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pickup:   40.783282, -73.950655"));
    assert!(stdout.contains("FeatureCollection"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fare_against_mock_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/predict"))
        .and(query_param("pickup_datetime", "2024-01-15 14:30:00"))
        .and(query_param("passenger_count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"fare": 13.456})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        taxifare(
            &[
                "fare",
                "--date",
                "2024-01-15",
                "--time",
                "14:30",
                "--passengers",
                "2",
            ],
            &uri,
            UNREACHABLE,
        )
    })
    .await
    .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("$ 13.46"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fare_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        taxifare(&["fare", "--date", "2024-01-15", "--time", "14:30"], &uri, UNREACHABLE)
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("status code 500"), "got: {stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains('$'));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        taxifare(
            &["validate", "--pickup-address", "Nonexistent Place Xyz123"],
            UNREACHABLE,
            &uri,
        )
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Address not found: Nonexistent Place Xyz123"), "got: {stderr}");
}
