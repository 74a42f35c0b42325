use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Timelike, Utc};
use clap::{Args, Parser, Subcommand};

use taxifare::models::trip::parse_time;
use taxifare::{FareRequestOrchestrator, LocationField, TaxiFareConfig, TaxiFareError, TripForm};

/// Taxi fare estimation CLI
#[derive(Parser, Debug)]
#[command(name = "taxifare")]
#[command(author, version, about = "Taxi fare estimation backed by a remote prediction service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve both trip endpoints and render the trip map
    Validate {
        #[command(flatten)]
        trip: TripArgs,

        /// Write the map as a standalone HTML page
        #[arg(long)]
        map_out: Option<PathBuf>,

        /// Print the map as GeoJSON
        #[arg(long)]
        geojson: bool,
    },

    /// Ask the prediction service for a fare estimate
    Fare {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// Serve the web form
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Args, Debug)]
struct TripArgs {
    /// Trip date (YYYY-MM-DD), defaults to today in the configured timezone
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Trip time (HH:MM), defaults to now in the configured timezone
    #[arg(long, value_parser = parse_time_arg)]
    time: Option<NaiveTime>,

    #[arg(long, allow_hyphen_values = true)]
    pickup_lat: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pickup_lon: Option<String>,

    /// Geocode the pickup from this address instead of coordinates
    #[arg(long, conflicts_with_all = ["pickup_lat", "pickup_lon"])]
    pickup_address: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    dropoff_lat: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    dropoff_lon: Option<String>,

    /// Geocode the dropoff from this address instead of coordinates
    #[arg(long, conflicts_with_all = ["dropoff_lat", "dropoff_lon"])]
    dropoff_address: Option<String>,

    /// Number of passengers (1-5)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    passengers: i64,
}

fn parse_time_arg(raw: &str) -> std::result::Result<NaiveTime, String> {
    parse_time(raw).map_err(|e| e.to_string())
}

impl TripArgs {
    /// Fill unset fields from the configuration and the current time
    fn into_form(self, config: &TaxiFareConfig, timezone: chrono_tz::Tz) -> TripForm {
        let now = Utc::now().with_timezone(&timezone);
        let trip = &config.trip;

        let pickup = match self.pickup_address {
            Some(address) => LocationField::address(address),
            None => LocationField::coordinates(
                self.pickup_lat.unwrap_or_else(|| trip.pickup_latitude.clone()),
                self.pickup_lon.unwrap_or_else(|| trip.pickup_longitude.clone()),
            ),
        };
        let dropoff = match self.dropoff_address {
            Some(address) => LocationField::address(address),
            None => LocationField::coordinates(
                self.dropoff_lat.unwrap_or_else(|| trip.dropoff_latitude.clone()),
                self.dropoff_lon.unwrap_or_else(|| trip.dropoff_longitude.clone()),
            ),
        };

        TripForm {
            date: self.date.unwrap_or_else(|| now.date_naive()),
            time: self.time.unwrap_or_else(|| {
                NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or_default()
            }),
            pickup,
            dropoff,
            passenger_count: self.passengers,
        }
    }
}

async fn run(cli: Cli, config: TaxiFareConfig) -> Result<()> {
    let orchestrator = Arc::new(FareRequestOrchestrator::from_config(&config)?);
    let timezone = orchestrator.timezone();

    match cli.command {
        Commands::Validate {
            trip,
            map_out,
            geojson,
        } => {
            let form = trip.into_form(&config, timezone);
            let preview = orchestrator.validate_trip(&form).await?;
            println!("Pickup:   {}", preview.pickup.format_coordinates());
            println!("Dropoff:  {}", preview.dropoff.format_coordinates());
            println!("Distance: {:.2} km (straight line)", preview.map.distance_km);

            if let Some(path) = map_out {
                std::fs::write(&path, preview.map.to_html())
                    .map_err(TaxiFareError::from)
                    .with_context(|| format!("Failed to write map to {}", path.display()))?;
                println!("Map written to {}", path.display());
            }
            if geojson {
                println!("{}", serde_json::to_string_pretty(&preview.map.to_geojson())?);
            }
        }
        Commands::Fare { trip } => {
            let form = trip.into_form(&config, timezone);
            let quote = orchestrator.compute_fare(&form).await?;
            tracing::debug!("Quote: {:?}", quote);
            println!(
                "Pickup at {} UTC, {} passenger(s)",
                quote.pickup_datetime,
                quote.passenger_count.get()
            );
            println!("{}", quote.display());
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            taxifare::web::run(orchestrator, &config.server.host, port).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TaxiFareConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = taxifare::logging::init(&config.logging, cli.verbose) {
        eprintln!("Warning: {e}");
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<TaxiFareError>() {
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
