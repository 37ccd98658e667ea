//! Track the straight-line distance and progress toward a selected destination
pub mod cli;
pub mod config;
mod error;
pub use error::Error;
pub mod gps;
pub use gps::{Coordinate, PositionSample, RouteLine};
pub mod region;
pub use region::{MapRegion, RegionController};
pub mod source;
pub use source::{feed, LocationSource, ReplaySource, SharedTracker};
pub mod status;
pub use status::{format_distance, format_progress, status_message, Status};
pub mod trace;
pub mod tracker;
pub use tracker::{Destination, DistanceTracker, TrackingSession, TrackingUpdate};
