// In-memory map and chart surfaces backing the /api/view endpoints
use crate::application::map_controller::{ChartSurface, LayerId, MapSurface};
use crate::application::track_renderer::DeviceLayer;
use crate::domain::chart::ChartData;
use crate::domain::track::BoundingBox;

/// Overlays currently attached to the map, in attach order.
#[derive(Debug, Default)]
pub struct LayerStore {
    next_id: LayerId,
    overlays: Vec<(LayerId, Vec<DeviceLayer>)>,
    viewport: Option<BoundingBox>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlays(&self) -> &[(LayerId, Vec<DeviceLayer>)] {
        &self.overlays
    }

    pub fn viewport(&self) -> Option<BoundingBox> {
        self.viewport
    }
}

impl MapSurface for LayerStore {
    fn add_overlay(&mut self, layers: &[DeviceLayer]) -> LayerId {
        self.next_id += 1;
        self.overlays.push((self.next_id, layers.to_vec()));
        self.next_id
    }

    fn remove_overlay(&mut self, id: LayerId) {
        let before = self.overlays.len();
        self.overlays.retain(|(layer_id, _)| *layer_id != id);
        if self.overlays.len() == before {
            tracing::debug!("Overlay {} was not attached", id);
        }
    }

    fn fit_bounds(&mut self, viewport: BoundingBox) {
        self.viewport = Some(viewport);
    }
}

#[derive(Debug, Default)]
pub struct ChartStore {
    dataset: Option<ChartData>,
}

impl ChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&ChartData> {
        self.dataset.as_ref()
    }
}

impl ChartSurface for ChartStore {
    fn replace_dataset(&mut self, chart: Option<&ChartData>) {
        self.dataset = chart.cloned();
    }
}
