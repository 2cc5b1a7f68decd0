// Calendar matching - Marks the picker days for which the backend reports data
use super::error::ViewerError;
use chrono::NaiveDate;

/// A day rendered by the picker, together with the widget's handle for its cell.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleDayCell<H> {
    pub day: NaiveDate,
    pub handle: H,
}

impl<H> VisibleDayCell<H> {
    pub fn new(day: NaiveDate, handle: H) -> Self {
        Self { day, handle }
    }
}

/// Capability interface over the picker's currently displayed months.
pub trait DayCellSource {
    type Handle;

    /// Day cells of every displayed month, concatenated in ascending order.
    ///
    /// Fails with [`ViewerError::WidgetNotReady`] while the widget has not
    /// finished rendering.
    fn list_visible_days(&self) -> Result<Vec<VisibleDayCell<Self::Handle>>, ViewerError>;

    /// Highlight one cell as having data. Marking the same cell twice is a no-op.
    fn mark_available(&mut self, handle: &Self::Handle);
}

/// Reverse two-pointer merge of two ascending day sequences.
///
/// Calls `mark` for every visible cell whose day is in `available` and
/// returns how many were marked.
///
/// Precondition: both `available` and `visible` are sorted ascending by day.
/// This is not checked; unsorted input gives unspecified marks.
pub fn match_available_days<H, F>(available: &[NaiveDate], visible: &[VisibleDayCell<H>], mut mark: F) -> usize
where
    F: FnMut(&H),
{
    let mut i = available.len();
    let mut j = visible.len();
    let mut marked = 0;

    while i > 0 && j > 0 {
        let wanted = available[i - 1];
        let cell = &visible[j - 1];

        if cell.day == wanted {
            mark(&cell.handle);
            marked += 1;
            i -= 1;
            j -= 1;
        } else if cell.day > wanted {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    marked
}

/// Run one redraw pass against a widget.
///
/// A widget that is not ready yet is skipped and reports zero marks; the
/// next redraw trigger retries.
pub fn mark_widget<W: DayCellSource>(available: &[NaiveDate], widget: &mut W) -> usize {
    let cells = match widget.list_visible_days() {
        Ok(cells) => cells,
        Err(ViewerError::WidgetNotReady(reason)) => {
            tracing::debug!("Skipping calendar redraw, widget not ready: {}", reason);
            return 0;
        }
        Err(e) => {
            tracing::warn!("Could not list visible calendar days: {}", e);
            return 0;
        }
    };

    match_available_days(available, &cells, |handle| widget.mark_available(handle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn cells(days: impl IntoIterator<Item = NaiveDate>) -> Vec<VisibleDayCell<usize>> {
        days.into_iter()
            .enumerate()
            .map(|(idx, day)| VisibleDayCell::new(day, idx))
            .collect()
    }

    struct FakeWidget {
        cells: Option<Vec<VisibleDayCell<usize>>>,
        marked: BTreeSet<usize>,
        mark_calls: usize,
    }

    impl DayCellSource for FakeWidget {
        type Handle = usize;

        fn list_visible_days(&self) -> Result<Vec<VisibleDayCell<usize>>, ViewerError> {
            self.cells
                .clone()
                .ok_or_else(|| ViewerError::WidgetNotReady("not rendered".to_string()))
        }

        fn mark_available(&mut self, handle: &usize) {
            self.mark_calls += 1;
            self.marked.insert(*handle);
        }
    }

    #[test]
    fn test_marks_exactly_the_available_days() {
        let available = vec![jan(2), jan(5), jan(9)];
        let visible = cells((1..=10).map(jan));

        let mut marked = Vec::new();
        let count = match_available_days(&available, &visible, |h| marked.push(*h));

        marked.sort();
        assert_eq!(count, 3);
        let days: Vec<NaiveDate> = marked.iter().map(|h| visible[*h].day).collect();
        assert_eq!(days, vec![jan(2), jan(5), jan(9)]);
    }

    #[test]
    fn test_empty_available_marks_nothing() {
        let visible = cells((1..=31).map(jan));
        let count = match_available_days(&[], &visible, |_| panic!("nothing should be marked"));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_available_dates_outside_visible_months_are_skipped() {
        let available = vec![
            NaiveDate::from_ymd_opt(2023, 12, 24).unwrap(),
            jan(3),
            jan(31),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ];
        let visible = cells(
            (1..=31)
                .map(jan)
                .chain((1..=29).map(|d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap())),
        );

        let mut marked = Vec::new();
        match_available_days(&available, &visible, |h| marked.push(visible[*h].day));
        marked.sort();
        assert_eq!(
            marked,
            vec![jan(3), jan(31), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()]
        );
    }

    #[test]
    fn test_marking_is_idempotent() {
        let mut widget = FakeWidget {
            cells: Some(cells((1..=10).map(jan))),
            marked: BTreeSet::new(),
            mark_calls: 0,
        };
        let available = vec![jan(2), jan(5), jan(9)];

        assert_eq!(mark_widget(&available, &mut widget), 3);
        let after_first = widget.marked.clone();
        assert_eq!(mark_widget(&available, &mut widget), 3);
        assert_eq!(widget.marked, after_first);
        assert_eq!(widget.marked.len(), 3);
    }

    #[test]
    fn test_widget_not_ready_is_skipped() {
        let mut widget = FakeWidget {
            cells: None,
            marked: BTreeSet::new(),
            mark_calls: 0,
        };
        assert_eq!(mark_widget(&[jan(1)], &mut widget), 0);
        assert_eq!(widget.mark_calls, 0);
    }
}
