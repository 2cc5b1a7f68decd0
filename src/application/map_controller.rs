// Map controller - Owns the current overlay and chart handles
use crate::application::track_renderer::{DeviceLayer, RenderedView, TrackRenderer};
use crate::domain::chart::ChartData;
use crate::domain::error::ViewerError;
use crate::domain::position::PositionBatch;
use crate::domain::selection::DateSelection;
use crate::domain::track::BoundingBox;

pub type LayerId = u64;

/// The map widget as seen by the controller.
pub trait MapSurface: Send {
    fn add_overlay(&mut self, layers: &[DeviceLayer]) -> LayerId;
    fn remove_overlay(&mut self, id: LayerId);
    fn fit_bounds(&mut self, viewport: BoundingBox);
}

/// The chart widget as seen by the controller.
pub trait ChartSurface: Send {
    /// Replace the displayed dataset; `None` clears it.
    fn replace_dataset(&mut self, chart: Option<&ChartData>);
}

/// Issued for every fetch; completions carry it back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub sequence: u64,
    pub selection: DateSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Installed { devices: usize, points: usize },
    Empty,
    /// A newer request was issued after this one; its result was dropped.
    Stale { sequence: u64, latest: u64 },
    FetchFailed(String),
}

pub struct MapController<M, C> {
    map: M,
    chart: C,
    renderer: TrackRenderer,
    selection: DateSelection,
    issued: u64,
    overlay: Option<LayerId>,
    view: Option<RenderedView>,
}

impl<M: MapSurface, C: ChartSurface> MapController<M, C> {
    pub fn new(map: M, chart: C, renderer: TrackRenderer, selection: DateSelection) -> Self {
        Self {
            map,
            chart,
            renderer,
            selection,
            issued: 0,
            overlay: None,
            view: None,
        }
    }

    pub fn selection(&self) -> DateSelection {
        self.selection
    }

    pub fn current_view(&self) -> Option<&RenderedView> {
        self.view.as_ref()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Hand out the ticket for a new selection's fetch. The selection is
    /// only taken over once its result is installed.
    pub fn begin(&mut self, selection: DateSelection) -> RequestTicket {
        self.issued += 1;
        RequestTicket {
            sequence: self.issued,
            selection,
        }
    }

    /// Apply a finished fetch.
    ///
    /// Results for anything but the latest ticket are discarded. A failed
    /// fetch leaves the current overlay untouched.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        fetched: anyhow::Result<PositionBatch>,
    ) -> UpdateOutcome {
        if ticket.sequence != self.issued {
            tracing::warn!(
                "Discarding stale response #{} (latest issued #{})",
                ticket.sequence,
                self.issued
            );
            return UpdateOutcome::Stale {
                sequence: ticket.sequence,
                latest: self.issued,
            };
        }

        let batch = match fetched {
            Ok(batch) => batch,
            Err(e) => {
                let err = ViewerError::Fetch(e);
                tracing::error!("Fetch problem for {:?}: {}", ticket.selection, err);
                return UpdateOutcome::FetchFailed(err.to_string());
            }
        };

        match self.renderer.render(batch) {
            Ok(view) => {
                let outcome = UpdateOutcome::Installed {
                    devices: view.layers.len(),
                    points: view.point_count(),
                };
                self.install(view);
                self.selection = ticket.selection;
                outcome
            }
            Err(ViewerError::EmptyInput) => {
                tracing::info!("No positions for {:?}", ticket.selection);
                self.retire();
                self.chart.replace_dataset(None);
                self.selection = ticket.selection;
                UpdateOutcome::Empty
            }
            Err(e) => {
                tracing::error!("Rendering failed for {:?}: {}", ticket.selection, e);
                UpdateOutcome::FetchFailed(e.to_string())
            }
        }
    }

    fn retire(&mut self) {
        if let Some(id) = self.overlay.take() {
            self.map.remove_overlay(id);
        }
        self.view = None;
    }

    fn install(&mut self, view: RenderedView) {
        self.retire();
        self.overlay = Some(self.map.add_overlay(&view.layers));
        self.map.fit_bounds(view.viewport);
        self.chart.replace_dataset(view.chart.as_ref());
        self.view = Some(view);
    }
}
