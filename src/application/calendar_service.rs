// Calendar service - Holds the available-dates list and marks picker cells
use crate::application::location_repository::LocationRepository;
use crate::domain::calendar::{mark_widget, DayCellSource};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct CalendarService {
    repository: Arc<dyn LocationRepository>,
    available: Arc<RwLock<Arc<Vec<NaiveDate>>>>,
}

impl CalendarService {
    pub fn new(repository: Arc<dyn LocationRepository>) -> Self {
        Self {
            repository,
            available: Arc::new(RwLock::new(Arc::new(Vec::new()))),
        }
    }

    /// Refetch the available dates and replace the list wholesale.
    ///
    /// On failure the previous list stays in place.
    pub async fn refresh(&self) -> anyhow::Result<usize> {
        let mut dates = self.repository.fetch_available_dates().await?;
        dates.sort_unstable();
        dates.dedup();

        let count = dates.len();
        *self.available.write().await = Arc::new(dates);
        tracing::info!("Loaded {} available dates", count);
        Ok(count)
    }

    /// Ascending, de-duplicated snapshot of the available dates.
    pub async fn available_dates(&self) -> Arc<Vec<NaiveDate>> {
        self.available.read().await.clone()
    }

    /// Mark every visible cell of the widget that has data. Returns the number of marked cells.
    pub async fn redraw<W: DayCellSource>(&self, widget: &mut W) -> usize {
        let available = self.available_dates().await;
        mark_widget(&available, widget)
    }
}
