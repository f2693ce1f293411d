//! Nominatim geocoding CLI
//!
//! Command-line front end for forward and reverse geocoding.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::value_objects::Position;
use integration_nominatim::{
    AddressNormalizer, GeocodingClient, GeocodingResponse, NominatimGeocodingClient, Query,
    QueryOptions,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::{BoxArg, load_config};

/// Nominatim geocoding CLI
#[derive(Parser)]
#[command(name = "nominatim-cli")]
#[command(author, version, about = "Forward and reverse geocoding via Nominatim", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./nominatim.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Nominatim base URL (overrides the configuration)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Prefer results inside this box: lat1,lon1,lat2,lon2
    #[arg(long, global = true, allow_hyphen_values = true)]
    bias: Option<BoxArg>,

    /// Send addresses as typed, without normalization
    #[arg(long, global = true)]
    no_normalize: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the position of an address
    ///
    /// Example: nominatim-cli search Vinohradská 12, Praha 2
    Search {
        /// Address words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,

        /// Only return results inside this box: lat1,lon1,lat2,lon2
        #[arg(long, allow_hyphen_values = true)]
        bounds: Option<BoxArg>,

        /// Preferred result language (accept-language)
        #[arg(long)]
        lang: Option<String>,

        /// Print the raw JSON matches
        #[arg(long)]
        raw: bool,
    },

    /// Find the address at a position
    Reverse {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Preferred result language (accept-language)
        #[arg(long)]
        lang: Option<String>,

        /// Print the raw JSON matches
        #[arg(long)]
        raw: bool,
    },

    /// Resolve position and address; "lat,lon" looks up in reverse
    Lookup {
        /// Address or "lat,lon"
        query: String,
    },

    /// Show how an address is rewritten before searching (no network)
    Normalize {
        /// Address words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Text query or reverse lookup, depending on whether the input is a coordinate pair
fn parse_lookup_query(input: &str) -> Query {
    input
        .parse::<Position>()
        .map_or_else(|_| Query::from(input), Query::from)
}

fn query_options(lang: Option<String>) -> QueryOptions {
    match lang {
        Some(lang) => QueryOptions::new().with_param("accept-language", lang),
        None => QueryOptions::new(),
    }
}

fn print_response(response: &GeocodingResponse, raw: bool) -> anyhow::Result<()> {
    if raw {
        println!("{}", serde_json::to_string_pretty(response.results())?);
        return Ok(());
    }

    match response.position() {
        Some(position) => println!("📍 {position}"),
        None => println!("📍 (no coordinates)"),
    }
    match response.address() {
        Some(address) => println!("🏠 {address}"),
        None => println!("🏠 (no address details)"),
    }
    if let Some(name) = response.display_name() {
        println!("🗺️  {name}");
    }
    if response.len() > 1 {
        println!("   ({} more match(es), use --raw to list them)", response.len() - 1);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.no_normalize {
        config.normalize_addresses = false;
    }

    if let Commands::Normalize { address } = &cli.command {
        let normalizer = AddressNormalizer::with_cities(&config.district_cities)?;
        println!("{}", normalizer.normalize(&address.join(" ")));
        return Ok(());
    }

    let mut client = NominatimGeocodingClient::new(&config)?;
    if let Some(bias) = cli.bias {
        client.set_bias(bias.first, bias.second);
    }

    let outcome = match cli.command {
        Commands::Search {
            address,
            bounds,
            lang,
            raw,
        } => {
            let mut options = query_options(lang);
            if let Some(bounds) = bounds {
                options = options.with_bounds(bounds.rectangle());
            }
            client
                .resolve_position_full(address.join(" ").into(), options)
                .await
                .map(|response| print_response(&response, raw))
        },

        Commands::Reverse { lat, lon, lang, raw } => {
            let position = Position::new(lat, lon)?;
            client
                .resolve_address_full(position, query_options(lang))
                .await
                .map(|response| print_response(&response, raw))
        },

        Commands::Lookup { query } => {
            let (position, address) = client
                .resolve_both(parse_lookup_query(&query), QueryOptions::new())
                .await;
            if position.is_none() && address.is_none() {
                println!("❌ Nothing found for: {query}");
                std::process::exit(1);
            }
            if let Some(position) = position {
                println!("📍 {position}");
            }
            if let Some(address) = address {
                println!("🏠 {address}");
            }
            Ok(Ok(()))
        },

        Commands::Normalize { .. } => Ok(Ok(())),
    };

    match outcome {
        Ok(printed) => printed,
        Err(e) => {
            println!("❌ {e}");
            std::process::exit(1);
        },
    }
}
