// Viewer service - Fetches positions and drives the map controller
use crate::application::location_repository::LocationRepository;
use crate::application::map_controller::{ChartSurface, MapController, MapSurface, UpdateOutcome};
use crate::application::track_renderer::{RenderedView, TrackRenderer};
use crate::domain::error::ViewerError;
use crate::domain::selection::DateSelection;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

pub struct ViewerService<M, C> {
    repository: Arc<dyn LocationRepository>,
    renderer: TrackRenderer,
    controller: Arc<Mutex<MapController<M, C>>>,
}

impl<M, C> Clone for ViewerService<M, C> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            renderer: self.renderer,
            controller: self.controller.clone(),
        }
    }
}

impl<M: MapSurface, C: ChartSurface> ViewerService<M, C> {
    pub fn new(
        repository: Arc<dyn LocationRepository>,
        renderer: TrackRenderer,
        controller: MapController<M, C>,
    ) -> Self {
        Self {
            repository,
            renderer,
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    /// Fetch and render a selection without touching the controller's overlay.
    pub async fn render(&self, selection: &DateSelection) -> Result<RenderedView, ViewerError> {
        let batch = self
            .repository
            .fetch_positions(selection)
            .await
            .map_err(ViewerError::Fetch)?;
        tracing::debug!(
            "Fetched {} positions from {} device(s) for {:?}",
            batch.record_count(),
            batch.device_count(),
            selection
        );
        self.renderer.render(batch)
    }

    /// Switch the controller to a new selection.
    ///
    /// The lock is released while the fetch is in flight, so a newer
    /// selection may be issued meanwhile; the controller then drops this
    /// response as stale.
    pub async fn select(&self, selection: DateSelection) -> UpdateOutcome {
        let ticket = self.controller.lock().await.begin(selection);
        let fetched = self.repository.fetch_positions(&ticket.selection).await;
        self.controller.lock().await.complete(ticket, fetched)
    }

    /// Move the installed selection one day back or forward. Fails without
    /// fetching when the shifted window is out of range.
    pub async fn step(&self, step: Step) -> Result<UpdateOutcome, ViewerError> {
        let current = self.controller.lock().await.selection();
        let selection = match step {
            Step::Previous => current.previous()?,
            Step::Next => current.next()?,
        };
        Ok(self.select(selection).await)
    }

    /// Read the controller state under the lock.
    pub async fn inspect<T>(&self, f: impl FnOnce(&MapController<M, C>) -> T) -> T {
        let controller = self.controller.lock().await;
        f(&controller)
    }
}
