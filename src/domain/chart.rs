// Time-series chart domain models
use super::track::DeviceTrack;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, points: Vec<TimeSeriesPoint>) -> Self {
        Self { id, name, points }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Line,
    MultiLine,
}

#[derive(Debug, Clone)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    /// Battery level chart, one series per device. `None` when no series has points.
    pub fn battery(series: Vec<SeriesData>) -> Option<Self> {
        let series: Vec<SeriesData> = series.into_iter().filter(|s| !s.points.is_empty()).collect();
        if series.is_empty() {
            return None;
        }

        let kind = if series.len() == 1 {
            ChartKind::Line
        } else {
            ChartKind::MultiLine
        };

        Some(Self {
            id: "battery".to_string(),
            title: "Battery level".to_string(),
            unit: Some("%".to_string()),
            kind,
            y_min: Some(0.0),
            y_max: Some(100.0),
            series,
        })
    }
}

/// Battery level over time. Records without a level are skipped, not zero-filled.
pub fn build_chart_series(track: &DeviceTrack) -> Vec<TimeSeriesPoint> {
    track
        .records()
        .iter()
        .filter_map(|r| {
            r.battery_level
                .map(|level| TimeSeriesPoint::new(r.timestamp.timestamp_millis(), level))
        })
        .collect()
}
