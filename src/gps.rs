//! Module with GPS specific structures
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::char;
use std::convert::TryFrom;

/// Equatorial radius of the WGS84 ellipsoid in meters
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Stores a single geospatial point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate from degrees, rejecting values outside of the valid ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || latitude.abs() > 90.0
            || longitude.abs() > 180.0
        {
            return Err(Error::InvalidCoordinate(latitude, longitude));
        }
        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from values already known to be in range
    pub(crate) const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point in meters using the haversine formula
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        // rounding can push `a` a hair past 1.0 for antipodal points
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_M * c
    }

    /// Arithmetic midpoint of the two coordinates, good enough for framing a map view
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            latitude: (self.latitude + other.latitude) / 2.0,
            longitude: (self.longitude + other.longitude) / 2.0,
        }
    }
}

/// A single position fix delivered by a location source
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    #[serde(flatten)]
    coordinate: Coordinate,
    /// altitude in meters if available
    #[serde(default)]
    altitude: Option<f64>,
    /// horizontal accuracy radius in meters if available
    #[serde(default)]
    accuracy: Option<f64>,
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
}

impl PositionSample {
    /// Create a sample stamped with the current time and no altitude or accuracy data
    pub fn new(coordinate: Coordinate) -> Self {
        PositionSample {
            coordinate,
            altitude: None,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_altitude(mut self, altitude: Option<f64>) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_accuracy(mut self, accuracy: Option<f64>) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Return altitude in meters (if defined)
    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    /// Return horizontal accuracy in meters (if defined)
    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Two point line from the current position to the destination
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteLine {
    origin: Coordinate,
    destination: Coordinate,
}

impl RouteLine {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        RouteLine {
            origin,
            destination,
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    /// Length of the line in meters
    pub fn length(&self) -> f64 {
        self.origin.distance_to(&self.destination)
    }

    /// Return the line as an encoded polyline string
    pub fn to_polyline(&self) -> Result<String, Error> {
        encode_coordinates(&[self.origin, self.destination])
    }
}

/// Encodes a slice of coordinates into Google Encoded Polyline format.
///
/// This code was extracted and simplified for our use case from:
/// https://github.com/georust/polyline
/// https://developers.google.com/maps/documentation/utilities/polylinealgorithm
pub fn encode_coordinates(coordinates: &[Coordinate]) -> Result<String, Error> {
    let mut output = String::new();
    let mut b = (0, 0);

    for a in coordinates {
        let a = (scale(a.latitude), scale(a.longitude));
        output.push_str(&encode(a.0, b.0)?);
        output.push_str(&encode(a.1, b.1)?);
        b = a;
    }

    Ok(output)
}

/// Scale a floating point value into an integer at the given precision
#[inline]
fn scale(n: f64) -> i64 {
    static FACTOR: f64 = 100_000.0; // use 5 digits of precision
    (FACTOR * n).round() as i64
}

/// Encode a single latitude or longitude value into the polyline format
fn encode(current: i64, previous: i64) -> Result<String, Error> {
    let mut coordinate = (current - previous) << 1;
    if (current - previous) < 0 {
        coordinate = !coordinate;
    }
    let mut output = String::new();
    while coordinate >= 0x20 {
        let from_char = char::from_u32(((0x20 | (coordinate & 0x1f)) + 63) as u32)
            .ok_or_else(|| Error::Other("Couldn't convert character".to_string()))?;
        output.push(from_char);
        coordinate >>= 5;
    }
    let from_char = char::from_u32((coordinate + 63) as u32)
        .ok_or_else(|| Error::Other("Couldn't convert character".to_string()))?;
    output.push(from_char);
    Ok(output)
}
