//! Nominatim geocoding integration
//!
//! Forward (address to coordinates) and reverse (coordinates to address)
//! geocoding against the [Nominatim](https://nominatim.openstreetmap.org)
//! API or any compatible instance.
//!
//! # Architecture
//!
//! [`GeocodingClient`] defines the interface, implemented by
//! [`NominatimGeocodingClient`]. The client builds the request parameters,
//! hands the GET to an [`HttpTransport`] ([`ReqwestTransport`] by default)
//! and classifies the answer into a [`GeocodingResponse`] or one of the
//! [`GeocodingError`] kinds. Free-text addresses pass through the
//! [`AddressNormalizer`] before a forward search.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_nominatim::{
//!     GeocodingClient, NominatimConfig, NominatimGeocodingClient, QueryOptions,
//! };
//!
//! let config = NominatimConfig {
//!     user_agent: "my-app/1.0 (ops@example.com)".to_string(),
//!     email: "ops@example.com".to_string(),
//!     ..NominatimConfig::default()
//! };
//! let client = NominatimGeocodingClient::new(&config)?;
//!
//! let position = client
//!     .resolve_position("Vinohradská 12, 120 00 Praha 2".into(), QueryOptions::new())
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod normalizer;
mod query;
mod response;
mod transport;

pub use client::{GeocodingClient, NominatimGeocodingClient};
pub use config::NominatimConfig;
pub use error::GeocodingError;
pub use normalizer::{AddressNormalizer, DEFAULT_DISTRICT_CITIES};
pub use query::{AddressQuery, Endpoint, Query, QueryOptions, RequestParams, ViewportBias};
pub use response::{GeocodingResponse, RawResult};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
