//! Configuration loading and argument types

use std::path::Path;
use std::str::FromStr;

use domain::value_objects::{Position, Rectangle};
use integration_nominatim::NominatimConfig;

/// Default configuration file name (without extension), looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "nominatim";

/// Environment variable prefix, e.g. `NOMINATIM_USER_AGENT`
const ENV_PREFIX: &str = "NOMINATIM";

/// Load the client configuration
///
/// Sources, lowest priority first: built-in defaults, the config file
/// (`nominatim.toml` unless `path` is given), `NOMINATIM_*` environment
/// variables.
pub fn load_config(path: Option<&Path>) -> Result<NominatimConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        // Override with environment variables (e.g., NOMINATIM_BASE_URL)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("district_cities")
                .try_parsing(true),
        );

    builder.build()?.try_deserialize()
}

/// A box given as `lat1,lon1,lat2,lon2`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxArg {
    /// First corner
    pub first: Position,
    /// Opposite corner
    pub second: Position,
}

impl BoxArg {
    /// The box as a rectangle
    pub const fn rectangle(self) -> Rectangle {
        Rectangle::new(self.first, self.second)
    }
}

impl FromStr for BoxArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid number in '{s}': {e}"))?;

        let [lat1, lon1, lat2, lon2] = values[..] else {
            return Err(format!("expected lat1,lon1,lat2,lon2 but got '{s}'"));
        };

        Ok(Self {
            first: Position::new(lat1, lon1).map_err(|e| e.to_string())?,
            second: Position::new(lat2, lon2).map_err(|e| e.to_string())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn box_arg_parses_four_values() {
        let arg: BoxArg = "50.1, 14.3, 50.0, 14.6".parse().unwrap();
        assert!((arg.first.latitude() - 50.1).abs() < f64::EPSILON);
        assert!((arg.second.longitude() - 14.6).abs() < f64::EPSILON);

        let (left, bottom, right, top) = arg.rectangle().bounds();
        assert!((left - 14.3).abs() < f64::EPSILON);
        assert!((bottom - 50.0).abs() < f64::EPSILON);
        assert!((right - 14.6).abs() < f64::EPSILON);
        assert!((top - 50.1).abs() < f64::EPSILON);
    }

    #[test]
    fn box_arg_rejects_wrong_arity() {
        assert!("50.1,14.3,50.0".parse::<BoxArg>().is_err());
        assert!("50.1,14.3,50.0,14.6,1".parse::<BoxArg>().is_err());
    }

    #[test]
    fn box_arg_rejects_garbage_and_out_of_range() {
        assert!("a,b,c,d".parse::<BoxArg>().is_err());
        assert!("95,14.3,50.0,14.6".parse::<BoxArg>().is_err());
    }

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://geo.example.org/"
user_agent = "geo-cli-test/1.0"
email = "ops@example.org"
normalize_addresses = false
district_cities = ["Wien"]
"#
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.base_url, "https://geo.example.org/");
        assert_eq!(config.user_agent, "geo-cli-test/1.0");
        assert_eq!(config.email, "ops@example.org");
        assert!(!config.normalize_addresses);
        assert_eq!(config.district_cities, vec!["Wien".to_string()]);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn load_config_missing_explicit_file_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/nominatim.toml"))).is_err());
    }
}
