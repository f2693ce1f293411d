//! Address normalization
//!
//! Nominatim's tokenizer copes badly with postal codes and with district
//! numbers appended to city names ("Praha 3"). Not every address point
//! carries the district, so leaving it in loses matches. The rewrite
//! below is a heuristic: it assumes no address contains a standalone
//! five-digit number that is not a postal code.

use std::sync::LazyLock;

use regex::Regex;

/// Cities with numbered administrative districts
pub const DEFAULT_DISTRICT_CITIES: &[&str] = &[
    "Praha",
    "Brno",
    "Olomouc",
    "Plzeň",
    "Plzen",
    "Ostrava",
    "Pardubice",
];

#[allow(clippy::expect_used)] // patterns are literals
static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{3}\W*[0-9]{2}").expect("valid ZIP pattern"));

#[allow(clippy::expect_used)]
static NUMBER_AFTER_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",([^0-9]*?)[0-9]+").expect("valid number pattern"));

#[allow(clippy::expect_used)]
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("valid separator pattern"));

#[allow(clippy::expect_used)]
static DEFAULT_DISTRICTS: LazyLock<Regex> = LazyLock::new(|| {
    district_pattern(DEFAULT_DISTRICT_CITIES.iter().copied()).expect("valid district pattern")
});

fn district_pattern<'a>(cities: impl IntoIterator<Item = &'a str>) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = cities.into_iter().map(regex::escape).collect();
    Regex::new(&format!(r"(?i)({}) +[0-9]+", alternatives.join("|")))
}

/// Rewrites free-text addresses for better Nominatim matches
#[derive(Debug, Clone)]
pub struct AddressNormalizer {
    districts: Option<Regex>,
}

impl Default for AddressNormalizer {
    fn default() -> Self {
        Self {
            districts: Some(DEFAULT_DISTRICTS.clone()),
        }
    }
}

impl AddressNormalizer {
    /// Create a normalizer with a custom list of district cities
    ///
    /// An empty list disables the district step.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined pattern exceeds the regex size limit.
    pub fn with_cities<S: AsRef<str>>(cities: &[S]) -> Result<Self, regex::Error> {
        let names: Vec<&str> = cities
            .iter()
            .map(|city| city.as_ref().trim())
            .filter(|c| !c.is_empty())
            .collect();

        let districts = if names.is_empty() {
            None
        } else {
            Some(district_pattern(names)?)
        };

        Ok(Self { districts })
    }

    /// Normalize an address
    ///
    /// 1. drop ZIP codes (`130 00`, `13000`, `130-00`)
    /// 2. drop every number after the first comma
    /// 3. drop district numbers after known cities (`Praha 3` -> `Praha`)
    /// 4. collapse runs of commas and whitespace into one space
    #[must_use]
    pub fn normalize(&self, address: &str) -> String {
        let mut address = ZIP_CODE.replace_all(address, "").into_owned();

        // each pass strips the first number behind every comma
        while NUMBER_AFTER_COMMA.is_match(&address) {
            address = NUMBER_AFTER_COMMA
                .replace_all(&address, ",${1}")
                .into_owned();
        }

        if let Some(districts) = &self.districts {
            address = districts.replace_all(&address, "${1}").into_owned();
        }

        SEPARATORS.replace_all(&address, " ").trim().to_string()
    }
}
