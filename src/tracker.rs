//! Destination distance tracking
//!
//! The tracker holds at most one session. The first distance computed after
//! `start` becomes the baseline and progress is measured against it for the
//! remainder of the session.
use crate::gps::{Coordinate, RouteLine};
use crate::status::Status;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

/// Display string used when a place could not be reverse geocoded
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

/// A place selected by the user as the tracking target
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    name: String,
    #[serde(default = "address_unavailable")]
    address: String,
    #[serde(flatten)]
    coordinate: Coordinate,
}

fn address_unavailable() -> String {
    ADDRESS_UNAVAILABLE.to_string()
}

impl Destination {
    /// Create a destination, a missing address falls back to a generic display string
    pub fn new(name: String, address: Option<String>, coordinate: Coordinate) -> Self {
        Destination {
            name,
            address: address.unwrap_or_else(address_unavailable),
            coordinate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// Tracking state for a single destination
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingSession {
    destination: Destination,
    baseline_distance: Option<f64>,
    current_distance: Option<f64>,
    /// always true while the tracker holds the session, `stop` drops it entirely
    active: bool,
}

impl TrackingSession {
    fn new(destination: Destination) -> Self {
        TrackingSession {
            destination,
            baseline_distance: None,
            current_distance: None,
            active: true,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Distance in meters captured by the first position after start
    pub fn baseline_distance(&self) -> Option<f64> {
        self.baseline_distance
    }

    /// Most recent distance in meters
    pub fn current_distance(&self) -> Option<f64> {
        self.current_distance
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Progress toward the destination, None until a position has been seen
    pub fn progress(&self) -> Option<f64> {
        self.current_distance
            .map(|current| progress(current, self.baseline_distance.unwrap_or(0.0)))
    }

    /// Derive the tracking state for a new position, the baseline is only ever set once
    fn update(&mut self, position: Coordinate) -> TrackingUpdate {
        let target = self.destination.coordinate;
        let distance = position.distance_to(&target);
        if self.baseline_distance.is_none() {
            debug!(
                "Baseline distance to '{}' set to {:.1} m",
                self.destination.name, distance
            );
            self.baseline_distance = Some(distance);
        }
        self.current_distance = Some(distance);

        let progress = progress(distance, self.baseline_distance.unwrap_or(0.0));
        trace!(
            "Position update: distance={:.1} m progress={:.3}",
            distance,
            progress
        );
        TrackingUpdate {
            distance,
            progress,
            route_line: RouteLine::new(position, target),
            status: Status::for_progress(progress),
        }
    }
}

/// Derived state produced by every position update during a session
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackingUpdate {
    distance: f64,
    progress: f64,
    route_line: RouteLine,
    status: Status,
}

impl TrackingUpdate {
    /// Distance to the destination in meters
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Fraction of the baseline distance already closed, in [0, 1]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn route_line(&self) -> RouteLine {
        self.route_line
    }

    pub fn status(&self) -> Status {
        self.status
    }
}

/// Owns the tracking lifecycle and derives progress from raw positions
#[derive(Debug, Default)]
pub struct DistanceTracker {
    session: Option<TrackingSession>,
    last_update: Option<TrackingUpdate>,
}

impl DistanceTracker {
    pub fn new() -> Self {
        DistanceTracker::default()
    }

    /// Begin tracking a destination, discarding any previous session.
    ///
    /// When the current position is known the baseline is captured immediately,
    /// otherwise it is deferred to the first position update.
    pub fn start(
        &mut self,
        destination: Destination,
        current_position: Option<Coordinate>,
    ) -> &TrackingSession {
        if let Some(previous) = &self.session {
            debug!(
                "Discarding tracking session for '{}'",
                previous.destination.name
            );
        }
        info!(
            "Started tracking distance to '{}' ({})",
            destination.name, destination.address
        );
        let mut session = TrackingSession::new(destination);
        self.last_update = match current_position {
            Some(position) => Some(session.update(position)),
            None => {
                debug!("No current position yet, deferring baseline distance");
                None
            }
        };
        self.session.insert(session)
    }

    /// Process a position sample, returns None when no session is active
    pub fn on_position_update(&mut self, position: Coordinate) -> Option<TrackingUpdate> {
        let update = self.session.as_mut()?.update(position);
        self.last_update = Some(update);
        Some(update)
    }

    /// Clear the active session, later updates are ignored until the next start
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Stopped tracking distance to '{}'", session.destination.name);
        }
        self.last_update = None;
    }

    pub fn session(&self) -> Option<&TrackingSession> {
        self.session.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.session.as_ref().map(|s| &s.destination)
    }

    /// State derived from the most recent update of the current session
    pub fn last_update(&self) -> Option<&TrackingUpdate> {
        self.last_update.as_ref()
    }
}

/// Fraction of `baseline` closed when `distance` remains, clamped to [0, 1]
pub fn progress(distance: f64, baseline: f64) -> f64 {
    if baseline <= 0.0 || !baseline.is_finite() {
        return 0.0;
    }
    (1.0 - distance / baseline).max(0.0).min(1.0)
}
