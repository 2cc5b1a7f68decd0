// Decoding of the location backend's JSON payloads
use crate::domain::position::{BatteryState, PositionBatch, PositionRecord};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

const UNKNOWN_DEVICE: &str = "unknown";

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: PointGeometry,
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    /// [lon, lat]
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    device_id: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    battery_level: Option<f64>,
    #[serde(default)]
    battery_state: Option<String>,
}

/// `[lon, lat, altitude, battery_level, battery_state_index, timestamp, wifi_index, speed]`
type PositionTuple = (
    f64,
    f64,
    Option<f64>,
    Option<f64>,
    Option<usize>,
    String,
    Option<usize>,
    Option<f64>,
);

#[derive(Debug, Deserialize)]
struct PositionCollection {
    #[serde(default)]
    states: Vec<String>,
    devices: serde_json::Map<String, Value>,
}

/// Decode either a flat list of GeoJSON point features or the compact
/// per-device collection. Records that cannot be decoded are skipped.
pub fn decode_positions(payload: Value) -> Result<PositionBatch> {
    match payload {
        Value::Array(features) => Ok(decode_features(features)),
        Value::Object(obj) if obj.contains_key("devices") => {
            let collection: PositionCollection = serde_json::from_value(Value::Object(obj))
                .context("Malformed position collection")?;
            Ok(decode_collection(collection))
        }
        _ => bail!("Unrecognised position payload"),
    }
}

fn decode_features(features: Vec<Value>) -> PositionBatch {
    let mut batch = PositionBatch::new();

    for value in features {
        let feature: Feature = match serde_json::from_value(value) {
            Ok(feature) => feature,
            Err(e) => {
                tracing::warn!("Skipping malformed feature: {}", e);
                continue;
            }
        };
        let props = feature.properties;

        if props.kind.as_deref() == Some("trip") {
            continue;
        }
        let Some(timestamp) = props.timestamp.as_deref().and_then(parse_timestamp) else {
            tracing::warn!("Skipping feature without a valid timestamp: {:?}", props.timestamp);
            continue;
        };

        let [lon, lat] = feature.geometry.coordinates;
        let mut record = PositionRecord::new(
            props.device_id.unwrap_or_else(|| UNKNOWN_DEVICE.to_string()),
            timestamp,
            lat,
            lon,
        );
        record.speed = props.speed;
        record.battery_level = props.battery_level.map(battery_percent);
        record.battery_state = props.battery_state.as_deref().map(BatteryState::from_label);
        batch.push(record);
    }

    batch
}

fn decode_collection(collection: PositionCollection) -> PositionBatch {
    let states: Vec<BatteryState> = collection
        .states
        .iter()
        .map(|s| BatteryState::from_label(s))
        .collect();
    let mut batch = PositionBatch::new();

    for (device_id, positions) in collection.devices {
        let Value::Array(positions) = positions else {
            tracing::warn!("Skipping device {}: positions are not a list", device_id);
            continue;
        };

        for value in positions {
            let tuple: PositionTuple = match serde_json::from_value(value) {
                Ok(tuple) => tuple,
                Err(e) => {
                    tracing::warn!("Skipping malformed position of {}: {}", device_id, e);
                    continue;
                }
            };
            let (lon, lat, _altitude, battery_level, state_idx, timestamp, _wifi_idx, speed) = tuple;
            let Some(timestamp) = parse_timestamp(&timestamp) else {
                tracing::warn!("Skipping position of {} with bad timestamp {}", device_id, timestamp);
                continue;
            };

            let mut record = PositionRecord::new(device_id.clone(), timestamp, lat, lon);
            record.speed = speed;
            record.battery_level = battery_level.map(battery_percent);
            record.battery_state = state_idx.map(|idx| {
                states.get(idx).copied().unwrap_or_else(|| {
                    tracing::warn!("Battery state index {} out of range", idx);
                    BatteryState::Unknown
                })
            });
            batch.push(record);
        }
    }

    batch
}

/// Parse the `YYYY-MM-DD` strings of the availability endpoint, skipping bad entries.
pub fn decode_available_dates(days: Vec<String>) -> Vec<NaiveDate> {
    days.into_iter()
        .filter_map(|day| match NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::warn!("Skipping available date {}: {}", day, e);
                None
            }
        })
        .collect()
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The backend reports battery as a 0..1 fraction.
fn battery_percent(fraction: f64) -> f64 {
    (fraction * 100.0).clamp(0.0, 100.0)
}
