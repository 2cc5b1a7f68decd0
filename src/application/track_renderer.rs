// Track renderer - Turns a fetched batch into overlay layers, viewport and chart
use crate::domain::chart::{build_chart_series, ChartData, SeriesData};
use crate::domain::error::ViewerError;
use crate::domain::overlay::{build_overlay, OverlayPoint};
use crate::domain::position::PositionBatch;
use crate::domain::track::{
    build_track, compute_bounding_box, compute_time_extent, viewport_for, BoundingBox, TimeExtent,
    ViewportPolicy,
};

/// Overlay points of one device.
#[derive(Debug, Clone)]
pub struct DeviceLayer {
    pub device_id: String,
    pub points: Vec<OverlayPoint>,
    pub bounds: BoundingBox,
    pub extent: TimeExtent,
}

#[derive(Debug, Clone)]
pub struct RenderedView {
    pub layers: Vec<DeviceLayer>,
    pub viewport: BoundingBox,
    pub chart: Option<ChartData>,
}

impl RenderedView {
    pub fn point_count(&self) -> usize {
        self.layers.iter().map(|l| l.points.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackRenderer {
    policy: ViewportPolicy,
}

impl TrackRenderer {
    pub fn new(policy: ViewportPolicy) -> Self {
        Self { policy }
    }

    /// Render every device of the batch. Fails with `EmptyInput` when the batch has no records.
    pub fn render(&self, batch: PositionBatch) -> Result<RenderedView, ViewerError> {
        if batch.is_empty() {
            return Err(ViewerError::EmptyInput);
        }

        let mut layers = Vec::with_capacity(batch.device_count());
        let mut series = Vec::with_capacity(batch.device_count());

        for (device_id, records) in batch.into_devices() {
            let track = match build_track(records) {
                Ok(track) => track,
                Err(ViewerError::EmptyInput) => {
                    tracing::debug!("Device {} has no records in range, skipping", device_id);
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::trace!("Device {} track has {} positions", device_id, track.len());
            series.push(SeriesData::new(
                device_id.clone(),
                device_id.clone(),
                build_chart_series(&track),
            ));
            layers.push(DeviceLayer {
                device_id,
                points: build_overlay(&track).collect(),
                bounds: compute_bounding_box(&track),
                extent: compute_time_extent(&track),
            });
        }

        let viewport = viewport_for(layers.iter().map(|l| l.bounds), self.policy)
            .ok_or(ViewerError::EmptyInput)?;

        if self.policy == ViewportPolicy::FirstDevice && layers.len() > 1 {
            tracing::debug!(
                "Viewport fitted to device {} only, {} other device(s) ignored",
                layers[0].device_id,
                layers.len() - 1
            );
        }

        Ok(RenderedView {
            layers,
            viewport,
            chart: ChartData::battery(series),
        })
    }
}
