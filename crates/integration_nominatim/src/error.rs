//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during a geocoding query
///
/// The first four variants mirror the stages of response classification
/// and are never folded into each other: a caller can always tell
/// "nothing matched" from "the service is unhappy".
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// No response was obtained (transport failure or empty body)
    #[error("Unable to connect to geocoding API: {0}")]
    Connection(String),

    /// A response was obtained but is not the expected JSON shape
    #[error("Unable to parse response from geocoding API: {0}")]
    InvalidResponse(String),

    /// The query succeeded but matched nothing
    #[error("Geocoding query failed (no results)")]
    NoResults,

    /// The service answered with a non-200 status and a usable body
    #[error("Geocoding query failed (status: {status})")]
    InvalidStatus {
        /// HTTP status code of the response
        status: u16,
    },

    /// Malformed caller input, rejected before any network activity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl GeocodingError {
    /// Returns true if repeating the same request later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::InvalidStatus { status } => *status == 429 || *status >= 500,
            Self::InvalidResponse(_) | Self::NoResults | Self::InvalidArgument(_) => false,
        }
    }
}

impl From<domain::DomainError> for GeocodingError {
    fn from(err: domain::DomainError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
