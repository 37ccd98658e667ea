//! Map a progress fraction onto the message and colour shown to the user
use serde::Serialize;
use std::fmt;

/// Ordered (threshold, message) pairs, the first threshold met wins
const STATUS_MESSAGES: [(f64, &str); 4] = [
    (0.95, "You've arrived at your destination!"),
    (0.85, "Almost there! You're very close!"),
    (0.6, "Getting closer! Keep going!"),
    (0.3, "You're making good progress!"),
];

const DEFAULT_MESSAGE: &str = "On your way! Keep going!";

/// Simple RGB colour with channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Color {
    /// Interpolate red -> yellow over [0, 0.5) and yellow -> green over [0.5, 1]
    pub fn for_progress(progress: f64) -> Self {
        let progress = clamp_unit(progress);
        if progress < 0.5 {
            Color {
                red: 1.0,
                green: progress * 2.0,
                blue: 0.0,
            }
        } else {
            Color {
                red: 1.0 - (progress - 0.5) * 2.0,
                green: 1.0,
                blue: 0.0,
            }
        }
    }

    /// Return the colour as a `#rrggbb` string
    pub fn to_hex(&self) -> String {
        let channel = |v: f64| (clamp_unit(v) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Status message paired with its display colour
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Status {
    message: &'static str,
    color: Color,
}

impl Status {
    pub fn for_progress(progress: f64) -> Self {
        Status {
            message: status_message(progress),
            color: Color::for_progress(progress),
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Return the message for the highest threshold the progress meets
pub fn status_message(progress: f64) -> &'static str {
    STATUS_MESSAGES
        .iter()
        .find(|(threshold, _)| progress >= *threshold)
        .map(|(_, message)| *message)
        .unwrap_or(DEFAULT_MESSAGE)
}

/// Human readable distance, whole meters below a kilometer
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} meters", meters as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Progress as a truncated whole percentage
pub fn format_progress(progress: f64) -> String {
    format!("{}%", (progress * 100.0) as i64)
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.max(0.0).min(1.0)
    }
}
