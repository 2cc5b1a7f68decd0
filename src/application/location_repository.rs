// Repository trait for location data access
use crate::domain::position::PositionBatch;
use crate::domain::selection::DateSelection;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Fetch every position recorded inside the selection's window, grouped per device
    async fn fetch_positions(&self, selection: &DateSelection) -> anyhow::Result<PositionBatch>;

    /// List the calendar days for which at least one position exists (order not guaranteed)
    async fn fetch_available_dates(&self) -> anyhow::Result<Vec<NaiveDate>>;
}
