//! Nominatim geocoding client
//!
//! Builds forward (`/search`) and reverse (`/reverse`) requests, hands them
//! to an [`HttpTransport`] and classifies the raw answer.
//!
//! The public instance allows at most one request per second. This client
//! does not throttle; callers sharing the public instance must.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::value_objects::{PostalAddress, Position};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::NominatimConfig;
use crate::error::GeocodingError;
use crate::normalizer::AddressNormalizer;
use crate::query::{AddressQuery, Query, QueryOptions, RequestParams, ViewportBias};
use crate::response::{GeocodingResponse, RawResult};
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert an address to the position of its best match
    async fn resolve_position(
        &self,
        query: AddressQuery,
        options: QueryOptions,
    ) -> Result<Option<Position>, GeocodingError>;

    /// Forward geocoding returning the full response
    async fn resolve_position_full(
        &self,
        query: AddressQuery,
        options: QueryOptions,
    ) -> Result<GeocodingResponse, GeocodingError>;

    /// Convert a position to the address of its best match
    async fn resolve_address(
        &self,
        position: Position,
        options: QueryOptions,
    ) -> Result<Option<PostalAddress>, GeocodingError>;

    /// Reverse geocoding returning the full response
    async fn resolve_address_full(
        &self,
        position: Position,
        options: QueryOptions,
    ) -> Result<GeocodingResponse, GeocodingError>;

    /// Resolve both position and address for any query
    ///
    /// Never fails: any error yields `(None, None)`.
    async fn resolve_both(
        &self,
        query: Query,
        options: QueryOptions,
    ) -> (Option<Position>, Option<PostalAddress>);
}

/// Nominatim client holding configuration and an optional viewport bias
pub struct NominatimGeocodingClient {
    transport: Arc<dyn HttpTransport>,
    config: NominatimConfig,
    base_url: Url,
    normalizer: AddressNormalizer,
    bias: Option<ViewportBias>,
}

impl fmt::Debug for NominatimGeocodingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NominatimGeocodingClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .field("bias", &self.bias)
            .finish_non_exhaustive()
    }
}

impl NominatimGeocodingClient {
    /// Create a client talking HTTP through `reqwest`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        config.validate().map_err(GeocodingError::InvalidArgument)?;

        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))
            .map_err(|e| GeocodingError::Connection(e.to_string()))?;

        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client with a custom transport
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or the district city list is invalid.
    pub fn with_transport(
        config: &NominatimConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GeocodingError> {
        let base_url = parse_base_url(&config.base_url)?;
        let normalizer = AddressNormalizer::with_cities(&config.district_cities)
            .map_err(|e| GeocodingError::InvalidArgument(e.to_string()))?;

        Ok(Self {
            transport,
            config: config.clone(),
            base_url,
            normalizer,
            bias: None,
        })
    }

    /// Point the client at another Nominatim instance
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), GeocodingError> {
        self.base_url = parse_base_url(base_url)?;
        self.config.base_url = base_url.to_string();
        Ok(())
    }

    /// Prefer results inside the box spanned by two corners for all following queries
    ///
    /// Two corners describe two candidate boxes on the globe (either way
    /// around the antimeridian); which one applies is up to the service.
    pub fn set_bias(&mut self, first: Position, second: Position) {
        self.bias = Some(ViewportBias { first, second });
    }

    /// Remove the viewport preference
    pub fn clear_bias(&mut self) {
        self.bias = None;
    }

    /// The active viewport preference
    #[must_use]
    pub const fn bias(&self) -> Option<ViewportBias> {
        self.bias
    }

    /// The client configuration
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Assemble the request for a query without sending it
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::InvalidArgument` for an empty address or
    /// out-of-range coordinates.
    pub fn build_request(
        &self,
        query: &Query,
        options: QueryOptions,
    ) -> Result<TransportRequest, GeocodingError> {
        let params = self.request_params(query, options)?;
        self.transport_request(&params)
    }

    /// Run a query through the shared request path
    ///
    /// Forward queries sent this way are not normalized.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, see [`GeocodingError`].
    #[instrument(skip(self, options))]
    pub async fn execute_query(
        &self,
        query: &Query,
        options: QueryOptions,
    ) -> Result<GeocodingResponse, GeocodingError> {
        let params = self.request_params(query, options)?;
        let request = self.transport_request(&params)?;

        debug!(url = %request.url, "Querying geocoding API");

        let response = self
            .transport
            .get(&request)
            .await
            .map_err(|e| GeocodingError::Connection(e.to_string()))?;

        classify(response, params)
    }

    fn request_params(
        &self,
        query: &Query,
        options: QueryOptions,
    ) -> Result<RequestParams, GeocodingError> {
        let mut params = RequestParams::from(options.params);

        match query {
            Query::Search(text) => {
                if text.as_str().trim().is_empty() {
                    return Err(GeocodingError::InvalidArgument(
                        "Address must not be empty".to_string(),
                    ));
                }
                params.remove("lat");
                params.remove("lon");
                params.insert("q", text.as_str());

                if let Some(bounds) = options.bounds {
                    let (left, bottom, right, top) = bounds.bounds();
                    params.insert("viewboxlbrt", format!("{left},{bottom},{right},{top}"));
                    params.insert("bounded", "1");
                }
            },
            Query::Reverse(position) => {
                let position = Position::new(position.latitude(), position.longitude())?;
                if options.bounds.is_some() {
                    debug!("Ignoring bounds for reverse lookup");
                }
                params.remove("q");
                params.insert("lat", position.latitude().to_string());
                params.insert("lon", position.longitude().to_string());
            },
        }

        if let Some(bias) = &self.bias {
            params.insert("viewbox", bias.viewbox());
            params.insert("bounded", "1");
        }

        params.insert("format", "json");
        params.insert("addressdetails", "1");
        params.insert("email", self.config.email.as_str());

        Ok(params)
    }

    fn transport_request(&self, params: &RequestParams) -> Result<TransportRequest, GeocodingError> {
        let mut url = self
            .base_url
            .join(params.endpoint().path())
            .map_err(|e| GeocodingError::InvalidArgument(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(params.iter());

        Ok(TransportRequest {
            url,
            user_agent: self.config.user_agent.clone(),
            credentials: self.config.credentials(),
        })
    }

    fn normalize(&self, query: AddressQuery) -> AddressQuery {
        if !self.config.normalize_addresses {
            return query;
        }
        let normalized = self.normalizer.normalize(query.as_str());
        if normalized.is_empty() {
            debug!(address = %query, "Normalization left nothing, sending address as given");
            return query;
        }
        debug!(original = %query, %normalized, "Normalized address");
        AddressQuery::from(normalized)
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    async fn resolve_position(
        &self,
        query: AddressQuery,
        options: QueryOptions,
    ) -> Result<Option<Position>, GeocodingError> {
        Ok(self.resolve_position_full(query, options).await?.position())
    }

    #[instrument(skip(self, options))]
    async fn resolve_position_full(
        &self,
        query: AddressQuery,
        options: QueryOptions,
    ) -> Result<GeocodingResponse, GeocodingError> {
        let query = Query::Search(self.normalize(query));
        self.execute_query(&query, options).await
    }

    async fn resolve_address(
        &self,
        position: Position,
        options: QueryOptions,
    ) -> Result<Option<PostalAddress>, GeocodingError> {
        let response = self.resolve_address_full(position, options).await?;
        Ok(response.address().cloned())
    }

    #[instrument(skip(self, options))]
    async fn resolve_address_full(
        &self,
        position: Position,
        options: QueryOptions,
    ) -> Result<GeocodingResponse, GeocodingError> {
        self.execute_query(&Query::Reverse(position), options).await
    }

    async fn resolve_both(
        &self,
        query: Query,
        options: QueryOptions,
    ) -> (Option<Position>, Option<PostalAddress>) {
        let result = match query {
            Query::Reverse(position) => self.resolve_address_full(position, options).await,
            Query::Search(text) => self.resolve_position_full(text, options).await,
        };

        match result {
            Ok(response) => (response.position(), response.address().cloned()),
            Err(e) => {
                debug!(error = %e, "Geocoding yielded no usable response");
                (None, None)
            },
        }
    }
}

/// Parse a base URL, making sure endpoint paths are appended rather than replacing the last segment
fn parse_base_url(base_url: &str) -> Result<Url, GeocodingError> {
    let base_url = base_url.trim();
    let base_url = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };

    Url::parse(&base_url)
        .map_err(|e| GeocodingError::InvalidArgument(format!("Invalid base URL: {e}")))
}

/// Nominatim answers a reverse miss with `{"error": "Unable to geocode"}`
fn is_not_found_marker(result: &RawResult) -> bool {
    result.len() == 1 && result.get("error").is_some_and(Value::is_string)
}

/// Classify a raw transport response
///
/// Order matters: missing body, unparseable body, empty result set, and
/// only then the status code.
fn classify(
    response: TransportResponse,
    params: RequestParams,
) -> Result<GeocodingResponse, GeocodingError> {
    let TransportResponse { status, body } = response;

    if body.is_empty() {
        return Err(GeocodingError::Connection(format!(
            "Empty response body (status: {status})"
        )));
    }

    let payload: Value = serde_json::from_str(&body)
        .map_err(|e| GeocodingError::InvalidResponse(e.to_string()))?;

    let results: Vec<RawResult> = match payload {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(result) => Ok(result),
                other => Err(GeocodingError::InvalidResponse(format!(
                    "Expected a result object, got: {other}"
                ))),
            })
            .collect::<Result<_, _>>()?,
        Value::Object(result) if is_not_found_marker(&result) => {
            debug!(?result, "Geocoding service reported no match");
            Vec::new()
        },
        Value::Object(result) => vec![result],
        other => {
            return Err(GeocodingError::InvalidResponse(format!(
                "Expected a result object or list, got: {other}"
            )));
        },
    };

    if results.is_empty() {
        return Err(GeocodingError::NoResults);
    }

    if status != 200 {
        warn!(status, "Geocoding API returned unexpected status");
        return Err(GeocodingError::InvalidStatus { status });
    }

    debug!(matches = results.len(), "Geocoding query succeeded");
    Ok(GeocodingResponse::new(results, params))
}
