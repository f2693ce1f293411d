//! Geocoding queries and request parameters

use std::collections::BTreeMap;
use std::fmt;

use domain::value_objects::{PostalAddress, Position, Rectangle};

/// Free-text address for a forward query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery(String);

impl AddressQuery {
    /// The query text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AddressQuery {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for AddressQuery {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&PostalAddress> for AddressQuery {
    fn from(address: &PostalAddress) -> Self {
        Self(address.to_string())
    }
}

impl From<PostalAddress> for AddressQuery {
    fn from(address: PostalAddress) -> Self {
        Self::from(&address)
    }
}

/// A geocoding query: text searches forward, a position looks up in reverse
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Address to coordinates
    Search(AddressQuery),
    /// Coordinates to address
    Reverse(Position),
}

impl From<AddressQuery> for Query {
    fn from(query: AddressQuery) -> Self {
        Self::Search(query)
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::Search(text.into())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self::Search(text.into())
    }
}

impl From<&PostalAddress> for Query {
    fn from(address: &PostalAddress) -> Self {
        Self::Search(address.into())
    }
}

impl From<PostalAddress> for Query {
    fn from(address: PostalAddress) -> Self {
        Self::Search(address.into())
    }
}

impl From<Position> for Query {
    fn from(position: Position) -> Self {
        Self::Reverse(position)
    }
}

/// Caller-supplied options for one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Restrict a forward search to this rectangle
    pub bounds: Option<Rectangle>,
    /// Extra parameters passed through verbatim (`accept-language`, `countrycodes`, ...)
    pub params: BTreeMap<String, String>,
}

impl QueryOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict a forward search to a rectangle
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rectangle) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Add a pass-through parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Persistent viewport preference spanned by two corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBias {
    /// First corner
    pub first: Position,
    /// Opposite corner
    pub second: Position,
}

impl ViewportBias {
    /// `viewbox` value as `lat1,lon1,lat2,lon2`
    #[must_use]
    pub fn viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.first.latitude(),
            self.first.longitude(),
            self.second.latitude(),
            self.second.longitude()
        )
    }
}

/// Service endpoint selected by the resolved parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Forward geocoding (`/search`)
    Search,
    /// Reverse geocoding (`/reverse`)
    Reverse,
}

impl Endpoint {
    /// Path segment appended to the base URL
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Reverse => "reverse",
        }
    }
}

/// The full parameter set of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    /// Look up a parameter
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set a parameter, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a parameter
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Iterate over all parameters in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reverse when both `lat` and `lon` are present and non-empty, search otherwise
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        let present = |key: &str| self.get(key).is_some_and(|v| !v.trim().is_empty());
        if present("lat") && present("lon") {
            Endpoint::Reverse
        } else {
            Endpoint::Search
        }
    }
}

impl From<BTreeMap<String, String>> for RequestParams {
    fn from(params: BTreeMap<String, String>) -> Self {
        Self(params)
    }
}
