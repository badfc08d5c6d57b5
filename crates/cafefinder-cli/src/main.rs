mod interactive;
mod location;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use cafefinder_core::{AppConfig, Coordinate, Radius};
use cafefinder_osm::{NominatimClient, OverpassClient};
use cafefinder_search::{Presentation, SearchOutcome, Session, SessionSettings};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::location::FixedLocation;
use crate::terminal::{OutputFormat, TerminalUi};

#[derive(Debug, Parser)]
#[command(name = "cafefinder")]
#[command(about = "Find cafes near a place using OpenStreetMap data")]
struct Cli {
    /// Search radius in meters (defaults to CAFEFINDER_DEFAULT_RADIUS_M)
    #[arg(long, global = true)]
    radius: Option<Radius>,

    /// Output format for statuses and results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Device position as "lat,lon" (overrides CAFEFINDER_DEVICE_LOCATION)
    #[arg(long, global = true, allow_hyphen_values = true)]
    location: Option<Coordinate>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search around the device position, falling back to the default center
    Start,
    /// Search around a coordinate
    Near {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Geocode an address and search around it
    Find {
        /// Free-text address; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },
    /// Read commands from stdin against one session
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = cafefinder_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let ui = Arc::new(TerminalUi::new(cli.format, std::io::stdout()));
    let session = build_session(&config, Presentation::unified(&ui))?;
    if let Some(radius) = cli.radius {
        session.set_radius(radius);
    }
    let location = FixedLocation::new(cli.location.or(config.device_location));

    let outcome = match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => session.start(&location).await,
        Commands::Near { lat, lon } => {
            let center = Coordinate::new(lat, lon).context("invalid --lat/--lon")?;
            session.search_at(center).await
        }
        Commands::Find { address } => session.find_address(&address.join(" ")).await,
        Commands::Interactive => {
            session.start(&location).await;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run(stdin, &session, &location).await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    Ok(exit_code(&outcome))
}

fn build_session(
    config: &AppConfig,
    ui: Presentation,
) -> anyhow::Result<Session<OverpassClient, NominatimClient>> {
    let overpass = OverpassClient::with_base_url(
        &config.overpass_url,
        &config.user_agent,
        config.request_timeout_secs,
    )
    .context("failed to build Overpass client")?;
    let nominatim = NominatimClient::with_base_url(
        &config.nominatim_url,
        &config.user_agent,
        config.request_timeout_secs,
    )
    .context("failed to build Nominatim client")?;
    Ok(Session::new(
        overpass,
        nominatim,
        ui,
        SessionSettings::from(config),
    ))
}

/// Service failures exit non-zero; "nothing found" and unavailable location
/// are ordinary outcomes.
fn exit_code(outcome: &SearchOutcome) -> ExitCode {
    match outcome {
        SearchOutcome::FetchFailed | SearchOutcome::GeocodeFailed => ExitCode::FAILURE,
        SearchOutcome::EmptyQuery => ExitCode::from(2),
        SearchOutcome::Ranked(_)
        | SearchOutcome::Empty
        | SearchOutcome::AddressNotFound
        | SearchOutcome::LocationUnavailable(_)
        | SearchOutcome::Superseded => ExitCode::SUCCESS,
    }
}
