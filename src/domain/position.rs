// Position domain model
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BatteryState {
    #[default]
    Unknown,
    Charging,
    Full,
    Unplugged,
}

impl BatteryState {
    /// Parse the lowercase label the backend uses. Unrecognised labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "charging" => BatteryState::Charging,
            "full" => BatteryState::Full,
            "unplugged" => BatteryState::Unplugged,
            _ => BatteryState::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BatteryState::Unknown => "unknown",
            BatteryState::Charging => "charging",
            BatteryState::Full => "full",
            BatteryState::Unplugged => "unplugged",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// in m/s
    pub speed: Option<f64>,
    /// 0-100
    pub battery_level: Option<f64>,
    pub battery_state: Option<BatteryState>,
}

impl PositionRecord {
    pub fn new(device_id: String, timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            device_id,
            timestamp,
            latitude,
            longitude,
            speed: None,
            battery_level: None,
            battery_state: None,
        }
    }
}

/// Records for one fetch, grouped per device.
///
/// Devices keep the order in which they first appeared in the payload, which
/// is the order the viewport policy iterates them in.
#[derive(Debug, Clone, Default)]
pub struct PositionBatch {
    devices: Vec<(String, Vec<PositionRecord>)>,
    index: HashMap<String, usize>,
}

impl PositionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PositionRecord) {
        match self.index.get(&record.device_id) {
            Some(&slot) => self.devices[slot].1.push(record),
            None => {
                self.index.insert(record.device_id.clone(), self.devices.len());
                self.devices.push((record.device_id.clone(), vec![record]));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.devices.iter().all(|(_, records)| records.is_empty())
    }

    pub fn record_count(&self) -> usize {
        self.devices.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn into_devices(self) -> Vec<(String, Vec<PositionRecord>)> {
        self.devices
    }
}

impl FromIterator<PositionRecord> for PositionBatch {
    fn from_iter<I: IntoIterator<Item = PositionRecord>>(iter: I) -> Self {
        let mut batch = PositionBatch::new();
        for record in iter {
            batch.push(record);
        }
        batch
    }
}
