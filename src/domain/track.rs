// Track domain model: chronologically ordered positions for one device
use super::error::ViewerError;
use super::position::PositionRecord;
use chrono::{DateTime, Utc};

/// Positions of a single device, sorted ascending by timestamp.
///
/// Only `build_track` constructs one, so a track is never empty.
#[derive(Debug, Clone)]
pub struct DeviceTrack {
    device_id: String,
    records: Vec<PositionRecord>,
}

impl DeviceTrack {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    fn first(&self) -> &PositionRecord {
        &self.records[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeExtent {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeExtent {
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }
}

/// Which device tracks decide the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportPolicy {
    /// Fit only the first device in mapping order; the rest are drawn but ignored.
    #[default]
    FirstDevice,
    /// Fit the union of every device's box.
    AllDevices,
}

/// Sort records ascending by timestamp. Ties keep their input order.
pub fn build_track(mut records: Vec<PositionRecord>) -> Result<DeviceTrack, ViewerError> {
    let device_id = match records.first() {
        Some(first) => first.device_id.clone(),
        None => return Err(ViewerError::EmptyInput),
    };
    records.sort_by_key(|r| r.timestamp);
    Ok(DeviceTrack { device_id, records })
}

pub fn compute_time_extent(track: &DeviceTrack) -> TimeExtent {
    let start = track.first().timestamp;
    track.records.iter().fold(
        TimeExtent { min: start, max: start },
        |extent, r| TimeExtent {
            min: extent.min.min(r.timestamp),
            max: extent.max.max(r.timestamp),
        },
    )
}

pub fn compute_bounding_box(track: &DeviceTrack) -> BoundingBox {
    let first = track.first();
    let seed = BoundingBox {
        min_lat: first.latitude,
        max_lat: first.latitude,
        min_lon: first.longitude,
        max_lon: first.longitude,
    };
    track.records.iter().fold(seed, |bbox, r| BoundingBox {
        min_lat: bbox.min_lat.min(r.latitude),
        max_lat: bbox.max_lat.max(r.latitude),
        min_lon: bbox.min_lon.min(r.longitude),
        max_lon: bbox.max_lon.max(r.longitude),
    })
}

/// Viewport for a set of per-device boxes, given in device mapping order.
pub fn viewport_for<I>(boxes: I, policy: ViewportPolicy) -> Option<BoundingBox>
where
    I: IntoIterator<Item = BoundingBox>,
{
    let mut boxes = boxes.into_iter();
    match policy {
        ViewportPolicy::FirstDevice => boxes.next(),
        ViewportPolicy::AllDevices => boxes.reduce(|acc, b| acc.union(&b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(secs: i64, lat: f64, lon: f64) -> PositionRecord {
        PositionRecord::new(
            "phone".to_string(),
            Utc.timestamp_opt(secs, 0).unwrap(),
            lat,
            lon,
        )
    }

    #[test]
    fn test_build_track_rejects_empty_input() {
        assert!(matches!(build_track(vec![]), Err(ViewerError::EmptyInput)));
    }

    #[test]
    fn test_build_track_sorts_and_keeps_every_record() {
        let input = vec![
            record(50, 1.0, 1.0),
            record(10, 2.0, 2.0),
            record(40, 3.0, 3.0),
            record(20, 4.0, 4.0),
            record(30, 5.0, 5.0),
        ];
        let track = build_track(input.clone()).unwrap();

        let times: Vec<i64> = track.records().iter().map(|r| r.timestamp.timestamp()).collect();
        assert_eq!(times, vec![10, 20, 30, 40, 50]);
        assert_eq!(track.len(), input.len());
        for r in &input {
            assert_eq!(track.records().iter().filter(|t| *t == r).count(), 1);
        }
        assert_eq!(track.device_id(), "phone");
    }

    #[test]
    fn test_build_track_ties_keep_input_order() {
        let track = build_track(vec![
            record(20, 0.0, 0.0),
            record(10, 1.0, 0.0),
            record(10, 2.0, 0.0),
            record(10, 3.0, 0.0),
        ])
        .unwrap();

        let lats: Vec<f64> = track.records().iter().map(|r| r.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_time_extent() {
        let track = build_track(vec![record(30, 0.0, 0.0), record(5, 0.0, 0.0), record(90, 0.0, 0.0)]).unwrap();
        let extent = compute_time_extent(&track);
        assert_eq!(extent.min.timestamp(), 5);
        assert_eq!(extent.max.timestamp(), 90);
        assert!(!extent.is_degenerate());

        let single = build_track(vec![record(7, 0.0, 0.0)]).unwrap();
        assert!(compute_time_extent(&single).is_degenerate());
    }

    #[test]
    fn test_bounding_box_single_point() {
        let track = build_track(vec![record(1, 48.13, 11.57)]).unwrap();
        let bbox = compute_bounding_box(&track);
        assert_eq!(bbox.min_lat, 48.13);
        assert_eq!(bbox.max_lat, 48.13);
        assert_eq!(bbox.min_lon, 11.57);
        assert_eq!(bbox.max_lon, 11.57);
    }

    #[test]
    fn test_bounding_box_and_center() {
        let track = build_track(vec![
            record(1, 48.0, 11.0),
            record(2, 50.0, 9.0),
            record(3, 49.0, 13.0),
        ])
        .unwrap();
        let bbox = compute_bounding_box(&track);
        assert_eq!(
            bbox,
            BoundingBox { min_lat: 48.0, max_lat: 50.0, min_lon: 9.0, max_lon: 13.0 }
        );
        assert_eq!(bbox.center(), (49.0, 11.0));
    }

    #[test]
    fn test_viewport_policies() {
        let first = BoundingBox { min_lat: 0.0, max_lat: 1.0, min_lon: 0.0, max_lon: 1.0 };
        let second = BoundingBox { min_lat: -5.0, max_lat: 0.5, min_lon: 2.0, max_lon: 3.0 };

        assert_eq!(viewport_for([first, second], ViewportPolicy::FirstDevice), Some(first));
        assert_eq!(
            viewport_for([first, second], ViewportPolicy::AllDevices),
            Some(BoundingBox { min_lat: -5.0, max_lat: 1.0, min_lon: 0.0, max_lon: 3.0 })
        );
        assert_eq!(viewport_for(Vec::new(), ViewportPolicy::FirstDevice), None);
    }
}
