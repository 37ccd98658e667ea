//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    InvalidConfigurationValue(String),
    InvalidCoordinate(f64, f64),
    Io(std::io::Error),
    Other(String),
    TrackerPoisoned,
    Yaml(serde_yaml::Error),
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::InvalidCoordinate(lat, lon) => write!(
                f,
                "Coordinate out of range: latitude={}, longitude={}",
                lat, lon
            ),
            Error::Io(e) => write!(f, "{}", e),
            Error::Other(msg) => write!(f, "{}", msg),
            Error::TrackerPoisoned => {
                write!(f, "Tracker state is unusable after a panic in another thread")
            }
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}
