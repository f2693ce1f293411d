//! Nominatim client configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for one Nominatim client instance
///
/// The public instance requires an identifying User-Agent and asks for a
/// contact email so operators can reach heavy users. Own instances are
/// not subject to those rules and may sit behind HTTP basic auth.
#[derive(Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Basic-auth user name (empty for no authentication)
    #[serde(default)]
    pub username: String,

    /// Basic-auth password (sensitive - uses `SecretString`)
    #[serde(default = "default_password", skip_serializing)]
    pub password: SecretString,

    /// User-Agent header identifying the application
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Contact email sent with every request
    #[serde(default)]
    pub email: String,

    /// Strip postal codes and district numbers before forward queries
    #[serde(default = "default_true")]
    pub normalize_addresses: bool,

    /// Cities whose trailing district number is dropped during normalization
    #[serde(default = "default_district_cities")]
    pub district_cities: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org/".to_string()
}

fn default_password() -> SecretString {
    SecretString::from(String::new())
}

fn default_user_agent() -> String {
    concat!("integration_nominatim/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_true() -> bool {
    true
}

fn default_district_cities() -> Vec<String> {
    crate::normalizer::DEFAULT_DISTRICT_CITIES
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: String::new(),
            password: default_password(),
            user_agent: default_user_agent(),
            email: String::new(),
            normalize_addresses: true,
            district_cities: default_district_cities(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for NominatimConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("email", &self.email)
            .field("normalize_addresses", &self.normalize_addresses)
            .field("district_cities", &self.district_cities)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NominatimConfig {
    /// Create a configuration pointing at a mock server
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            user_agent: "integration_nominatim tests".to_string(),
            email: "test@example.com".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Basic-auth credentials, if a user name is configured
    #[must_use]
    pub fn credentials(&self) -> Option<(String, String)> {
        if self.username.is_empty() {
            return None;
        }
        Some((
            self.username.clone(),
            self.password.expose_secret().to_string(),
        ))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
