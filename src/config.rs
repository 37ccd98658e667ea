//! Store application configuration that gets read from disk
use crate::gps::Coordinate;
use crate::region::Span;
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use simplelog::LevelFilter;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Map region behaviour, defaults match the values used on device
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Where the map starts before any position is known
    pub initial_center: Coordinate,
    pub initial_span: Span,
    /// Span used when following the user's position
    pub follow_span: Span,
    /// Multiplier applied to a route's extents when framing it
    pub fit_padding: f64,
    /// Smallest span used when framing a route, in degrees
    pub min_fit_span: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            initial_center: Coordinate::from_degrees(41.0082, 28.9784),
            initial_span: Span::new(0.05, 0.05),
            follow_span: Span::new(0.01, 0.01),
            fit_padding: 1.5,
            min_fit_span: 0.005,
        }
    }
}

impl RegionConfig {
    fn validate(&self) -> Result<(), Error> {
        if !(self.fit_padding.is_finite() && self.fit_padding > 0.0) {
            return Err(Error::InvalidConfigurationValue(format!(
                "invalid value for region.fit_padding, expected a positive number: {}",
                self.fit_padding
            )));
        }
        for (key, value) in &[
            ("initial_span", self.initial_span),
            ("follow_span", self.follow_span),
        ] {
            if value.latitude_delta <= 0.0 || value.longitude_delta <= 0.0 {
                return Err(Error::InvalidConfigurationValue(format!(
                    "invalid value for region.{}, expected positive deltas: {:?}",
                    key, value
                )));
            }
        }
        if self.min_fit_span < 0.0 {
            return Err(Error::InvalidConfigurationValue(format!(
                "invalid value for region.min_fit_span, expected a non-negative number: {}",
                self.min_fit_span
            )));
        }
        Ok(())
    }
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default)]
    region: RegionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            region: RegionConfig::default(),
        }
    }
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, Error> {
        let config: Config = serde_yaml::from_reader(source)?;
        config.region.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, a missing file at the default location yields defaults
    pub fn from_path(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Config::load(&mut File::open(path)?),
            None => {
                let path = config_file_path();
                if path.exists() {
                    Config::load(&mut File::open(&path)?)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn region(&self) -> &RegionConfig {
        &self.region
    }
}

/// Default location of the configuration file
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("closeby")
        .join("config.yml")
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mapping_uses_defaults() {
        let config = Config::load(&mut "{}".as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.region(), &RegionConfig::default());
    }

    #[test]
    fn test_load_overrides() {
        let yaml = "
log_level: debug
region:
  initial_center: { latitude: 52.52, longitude: 13.405 }
  follow_span: { latitude_delta: 0.02, longitude_delta: 0.03 }
  fit_padding: 2.0
";
        let config = Config::load(&mut yaml.as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        let region = config.region();
        assert_eq!(region.initial_center, Coordinate::new(52.52, 13.405).unwrap());
        assert_eq!(region.follow_span, Span::new(0.02, 0.03));
        assert_eq!(region.fit_padding, 2.0);
        // untouched keys keep their defaults
        assert_eq!(region.min_fit_span, 0.005);
        assert_eq!(region.initial_span, Span::new(0.05, 0.05));
    }

    #[test]
    fn test_invalid_level() {
        assert!(Config::load(&mut "log_level: loud".as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_region_values() {
        let yaml = "region:\n  fit_padding: 0.0\n";
        match Config::load(&mut yaml.as_bytes()) {
            Err(Error::InvalidConfigurationValue(msg)) => assert!(msg.contains("fit_padding")),
            other => panic!("unexpected result: {:?}", other),
        }
        let yaml = "region:\n  initial_center: { latitude: 95.0, longitude: 0.0 }\n";
        assert!(Config::load(&mut yaml.as_bytes()).is_err());
    }
}
