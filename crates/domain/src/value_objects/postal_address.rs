//! Postal address value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured postal address
///
/// Every part is optional because geocoding services rarely return all
/// of them. The `Display` form is a single line suitable as a free-text
/// search query: `street house_number, postcode city, country`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    /// Street name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// House number, possibly with a suffix ("12a", "1234/5")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    /// Postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// City, town or village
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Country name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code (lowercase)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl PostalAddress {
    /// Create an address from street, house number and city
    #[must_use]
    pub fn new(
        street: impl Into<String>,
        house_number: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            street: Some(street.into()),
            house_number: Some(house_number.into()),
            city: Some(city.into()),
            ..Self::default()
        }
    }

    /// Set the postal code
    #[must_use]
    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    /// Set the country name
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// True when no part of the address is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.house_number,
            &self.postcode,
            &self.city,
            &self.country,
            &self.country_code,
        ]
        .iter()
        .all(|part| part.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

/// Join the non-empty parts with a separator
fn join_parts<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, sep: &str) -> String {
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let street = join_parts(
            [self.street.as_deref(), self.house_number.as_deref()],
            " ",
        );
        let locality = join_parts([self.postcode.as_deref(), self.city.as_deref()], " ");
        let line = join_parts(
            [
                Some(street.as_str()),
                Some(locality.as_str()),
                self.country.as_deref(),
            ],
            ", ",
        );
        f.write_str(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_full_address() {
        let address = PostalAddress::new("Vinohradská", "12", "Praha")
            .with_postcode("120 00")
            .with_country("Česko");
        assert_eq!(address.to_string(), "Vinohradská 12, 120 00 Praha, Česko");
    }

    #[test]
    fn test_display_skips_missing_parts() {
        let address = PostalAddress {
            city: Some("Brno".to_string()),
            country: Some("Česko".to_string()),
            ..PostalAddress::default()
        };
        assert_eq!(address.to_string(), "Brno, Česko");
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(PostalAddress::default().to_string(), "");
    }

    #[test]
    fn test_is_empty() {
        assert!(PostalAddress::default().is_empty());
        let blank = PostalAddress {
            street: Some("  ".to_string()),
            ..PostalAddress::default()
        };
        assert!(blank.is_empty());
        assert!(!PostalAddress::new("Masarykova", "1", "Brno").is_empty());
    }

    #[test]
    fn test_serialization_skips_missing_parts() {
        let address = PostalAddress::new("Masarykova", "1", "Brno");
        let json = serde_json::to_string(&address).expect("serialize");
        assert!(!json.contains("postcode"));

        let deserialized: PostalAddress = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(deserialized, address);
    }
}
