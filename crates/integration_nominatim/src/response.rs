//! Successful geocoding response
//!
//! Wraps the raw Nominatim payload and derives a position and a postal
//! address from the best (first) match on demand.

use std::sync::OnceLock;

use domain::value_objects::{PostalAddress, Position};
use serde_json::{Map, Value};

use crate::query::RequestParams;

/// A single raw result object
pub type RawResult = Map<String, Value>;

/// Address keys Nominatim may use for the street, in order of preference
const STREET_KEYS: &[&str] = &["road", "pedestrian", "footway", "path", "square", "place"];

/// Address keys Nominatim may use for the locality, in order of preference
const CITY_KEYS: &[&str] = &[
    "city",
    "town",
    "village",
    "hamlet",
    "municipality",
    "suburb",
];

/// Result of a successful geocoding query
#[derive(Debug)]
pub struct GeocodingResponse {
    results: Vec<RawResult>,
    params: RequestParams,
    position: OnceLock<Option<Position>>,
    address: OnceLock<Option<PostalAddress>>,
}

impl GeocodingResponse {
    /// Wrap a parsed payload and the parameters that produced it
    #[must_use]
    pub const fn new(results: Vec<RawResult>, params: RequestParams) -> Self {
        Self {
            results,
            params,
            position: OnceLock::new(),
            address: OnceLock::new(),
        }
    }

    /// Position of the best match, if it carries usable coordinates
    pub fn position(&self) -> Option<Position> {
        *self
            .position
            .get_or_init(|| self.first().and_then(parse_position))
    }

    /// Postal address of the best match, if address details were returned
    pub fn address(&self) -> Option<&PostalAddress> {
        self.address
            .get_or_init(|| self.first().and_then(parse_address))
            .as_ref()
    }

    /// Human-readable name of the best match
    pub fn display_name(&self) -> Option<&str> {
        self.first()?.get("display_name")?.as_str()
    }

    /// The best match
    pub fn first(&self) -> Option<&RawResult> {
        self.results.first()
    }

    /// All matches in the order the service ranked them
    pub fn results(&self) -> &[RawResult] {
        &self.results
    }

    /// Number of matches
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when there are no matches
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Parameters of the request that produced this response
    pub const fn params(&self) -> &RequestParams {
        &self.params
    }
}

/// Read a coordinate that may be encoded as a JSON string or number
fn coordinate(result: &RawResult, key: &str) -> Option<f64> {
    match result.get(key)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn parse_position(result: &RawResult) -> Option<Position> {
    let latitude = coordinate(result, "lat")?;
    let longitude = coordinate(result, "lon")?;
    Position::new(latitude, longitude).ok()
}

fn parse_address(result: &RawResult) -> Option<PostalAddress> {
    let details = result.get("address")?.as_object()?;

    let field = |key: &str| {
        details
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };
    let first_of = |keys: &[&str]| keys.iter().find_map(|&key| field(key));

    let address = PostalAddress {
        street: first_of(STREET_KEYS),
        house_number: field("house_number"),
        postcode: field("postcode"),
        city: first_of(CITY_KEYS),
        country: field("country"),
        country_code: field("country_code"),
    };

    (!address.is_empty()).then_some(address)
}
