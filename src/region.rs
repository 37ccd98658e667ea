//! Map region policy: follow the user's position unless a sheet is covering the map
use crate::config::RegionConfig;
use crate::gps::{Coordinate, RouteLine};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Latitude and longitude extents of a map view in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Span {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Span {
            latitude_delta,
            longitude_delta,
        }
    }
}

/// Visible area of the map
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span: Span,
}

impl MapRegion {
    pub fn new(center: Coordinate, span: Span) -> Self {
        MapRegion { center, span }
    }

    /// Check if a coordinate falls inside the region
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (coordinate.latitude() - self.center.latitude()).abs() <= self.span.latitude_delta / 2.0
            && (coordinate.longitude() - self.center.longitude()).abs()
                <= self.span.longitude_delta / 2.0
    }
}

/// Decides where the map is centered as positions arrive
#[derive(Clone, Debug)]
pub struct RegionController {
    region: MapRegion,
    follow_span: Span,
    fit_padding: f64,
    min_fit_span: f64,
    suppressed: bool,
}

impl RegionController {
    pub fn from_config(config: &RegionConfig) -> Self {
        RegionController {
            region: MapRegion::new(config.initial_center, config.initial_span),
            follow_span: config.follow_span,
            fit_padding: config.fit_padding,
            min_fit_span: config.min_fit_span,
            suppressed: false,
        }
    }

    pub fn region(&self) -> MapRegion {
        self.region
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Stop recentering on new positions, used while a sheet is open
    pub fn suppress(&mut self) {
        debug!("Automatic map recentering suppressed");
        self.suppressed = true;
    }

    /// Allow recentering again, the next position moves the map
    pub fn resume(&mut self) {
        debug!("Automatic map recentering resumed");
        self.suppressed = false;
    }

    /// Recenter on a new position unless suppressed, returns true if the region moved
    pub fn on_position_update(&mut self, position: Coordinate) -> bool {
        if self.suppressed {
            trace!("Ignoring position for map region while suppressed");
            return false;
        }
        self.region = MapRegion::new(position, self.follow_span);
        true
    }

    /// Explicitly center the map, e.g. on a selected place, even while suppressed
    pub fn center_on(&mut self, coordinate: Coordinate) {
        self.region = MapRegion::new(coordinate, self.follow_span);
    }

    /// Region that shows both ends of a route line with some padding
    pub fn fit_route(&self, line: &RouteLine) -> MapRegion {
        let origin = line.origin();
        let destination = line.destination();
        let lat_delta = (origin.latitude() - destination.latitude()).abs() * self.fit_padding;
        let lon_delta = (origin.longitude() - destination.longitude()).abs() * self.fit_padding;
        MapRegion::new(
            origin.midpoint(&destination),
            Span::new(
                lat_delta.max(self.min_fit_span),
                lon_delta.max(self.min_fit_span),
            ),
        )
    }
}

impl Default for RegionController {
    fn default() -> Self {
        RegionController::from_config(&RegionConfig::default())
    }
}
