// Two-month date-range picker grid
use crate::domain::calendar::{DayCellSource, VisibleDayCell};
use crate::domain::error::ViewerError;
use chrono::{Datelike, Months, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub day: NaiveDate,
    pub background: Option<String>,
}

/// Day cells of the months a picker currently shows.
///
/// The grid starts unrendered; `render` lays out the cells of the displayed
/// months, and only then can they be listed or marked.
#[derive(Debug, Clone)]
pub struct CalendarGrid {
    first_month: NaiveDate,
    month_count: u32,
    highlight_color: String,
    cells: Option<Vec<DayCell>>,
}

impl CalendarGrid {
    /// A picker showing `month_count` consecutive months starting at the month of `first_month`.
    pub fn new(first_month: NaiveDate, month_count: u32, highlight_color: String) -> Self {
        Self {
            first_month: first_month.with_day(1).unwrap_or(first_month),
            month_count,
            highlight_color,
            cells: None,
        }
    }

    pub fn render(&mut self) {
        let end = self
            .first_month
            .checked_add_months(Months::new(self.month_count))
            .unwrap_or(NaiveDate::MAX);
        let cells = self
            .first_month
            .iter_days()
            .take_while(|d| *d < end)
            .map(|day| DayCell {
                day,
                background: None,
            })
            .collect();
        self.cells = Some(cells);
    }

    pub fn first_month(&self) -> NaiveDate {
        self.first_month
    }

    pub fn cells(&self) -> &[DayCell] {
        self.cells.as_deref().unwrap_or_default()
    }
}

impl DayCellSource for CalendarGrid {
    type Handle = usize;

    fn list_visible_days(&self) -> Result<Vec<VisibleDayCell<usize>>, ViewerError> {
        let cells = self
            .cells
            .as_ref()
            .ok_or_else(|| ViewerError::WidgetNotReady("grid not rendered".to_string()))?;
        Ok(cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| VisibleDayCell::new(cell.day, idx))
            .collect())
    }

    fn mark_available(&mut self, handle: &usize) {
        let color = self.highlight_color.clone();
        if let Some(cell) = self.cells.as_mut().and_then(|cells| cells.get_mut(*handle)) {
            cell.background = Some(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::mark_widget;

    #[test]
    fn test_render_two_months() {
        let mut grid = CalendarGrid::new(
            NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
            2,
            "green".to_string(),
        );
        assert!(matches!(grid.list_visible_days(), Err(ViewerError::WidgetNotReady(_))));

        grid.render();
        let days = grid.list_visible_days().unwrap();
        assert_eq!(days.len(), 31 + 29);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[59].day, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(days.windows(2).all(|w| w[0].day < w[1].day));
    }

    #[test]
    fn test_mark_sets_background() {
        let mut grid = CalendarGrid::new(
            NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
            2,
            "green".to_string(),
        );
        grid.render();

        let available = vec![
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        ];
        assert_eq!(mark_widget(&available, &mut grid), 2);

        let marked: Vec<NaiveDate> = grid
            .cells()
            .iter()
            .filter(|c| c.background.as_deref() == Some("green"))
            .map(|c| c.day)
            .collect();
        assert_eq!(marked, available[..2].to_vec());
    }
}
