// Overlay geometry handed to the map widget
use super::color::{color_for_timestamp, Color};
use super::position::PositionRecord;
use super::track::{compute_time_extent, DeviceTrack};

const MS_TO_KMH: f64 = 3.6;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub color: Color,
    pub popup: String,
}

/// Circle marker style shared by every overlay point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 3.0,
            weight: 0.0,
            opacity: 0.5,
            fill_opacity: 0.5,
        }
    }
}

/// One overlay point per record, in track order.
///
/// The iterator borrows the track, so calling this again regenerates the
/// same sequence.
pub fn build_overlay(track: &DeviceTrack) -> impl Iterator<Item = OverlayPoint> + Clone + '_ {
    let extent = compute_time_extent(track);
    track.records().iter().map(move |r| OverlayPoint {
        latitude: r.latitude,
        longitude: r.longitude,
        color: color_for_timestamp(r.timestamp, &extent),
        popup: popup_text(r),
    })
}

pub fn popup_text(record: &PositionRecord) -> String {
    let mut popup = format!(
        "<p><b>{}</b></p>",
        record.timestamp.format("%Y-%m-%dT%H:%M:%SZ")
    );

    if let Some(speed) = record.speed.filter(|s| *s > 0.0) {
        popup.push_str(&format!("<p>{} km/h</p>", MS_TO_KMH * speed));
    }
    if let Some(level) = record.battery_level {
        popup.push_str(&format!("<p>Battery: {}%</p>", level));
    }
    if let Some(state) = record.battery_state {
        popup.push_str(&format!("<p>Battery state: {}</p>", state.label()));
    }

    popup
}
