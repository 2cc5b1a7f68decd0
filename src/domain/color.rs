// Temporal heat encoding: early points blue, late points red
use super::track::TimeExtent;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Interpolate the gradient at `percent` (expected in [0, 1]).
    pub fn from_percent(percent: f64) -> Self {
        Self {
            r: percent * 255.0,
            g: 120.0 * percent,
            b: (1.0 - percent) * 255.0,
        }
    }

    /// CSS form handed to the map widget, e.g. `rgb(255, 120, 0)`.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Position of `ts` inside the extent, clamped to [0, 1]. A degenerate extent yields 0.
pub fn time_percent(ts: DateTime<Utc>, extent: &TimeExtent) -> f64 {
    if extent.is_degenerate() {
        return 0.0;
    }
    let span = (extent.max - extent.min).num_milliseconds() as f64;
    let offset = (ts - extent.min).num_milliseconds() as f64;
    (offset / span).clamp(0.0, 1.0)
}

pub fn color_for_timestamp(ts: DateTime<Utc>, extent: &TimeExtent) -> Color {
    Color::from_percent(time_percent(ts, extent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_gradient_endpoints() {
        let extent = TimeExtent { min: at(0), max: at(100) };

        assert_eq!(color_for_timestamp(at(0), &extent), Color { r: 0.0, g: 0.0, b: 255.0 });
        assert_eq!(color_for_timestamp(at(100), &extent), Color { r: 255.0, g: 120.0, b: 0.0 });
        assert_eq!(color_for_timestamp(at(50), &extent).to_css(), "rgb(127.5, 60, 127.5)");
    }

    #[test]
    fn test_percent_is_monotonic_and_clamped() {
        let extent = TimeExtent { min: at(1_000), max: at(2_000) };
        let mut previous = 0.0;
        for secs in (900..2_100).step_by(37) {
            let p = time_percent(at(secs), &extent);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= previous);
            previous = p;
        }
        assert_eq!(time_percent(at(0), &extent), 0.0);
        assert_eq!(time_percent(at(5_000), &extent), 1.0);
    }

    #[test]
    fn test_degenerate_extent_is_all_blue() {
        let extent = TimeExtent { min: at(42), max: at(42) };
        let color = color_for_timestamp(at(42), &extent);
        assert!(!color.r.is_nan() && !color.g.is_nan() && !color.b.is_nan());
        assert_eq!(color, Color::from_percent(0.0));
        assert_eq!(color.to_css(), "rgb(0, 0, 255)");
    }
}
