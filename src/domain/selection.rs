// Date selection driving which records are fetched
use super::error::ViewerError;
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl Period {
    pub fn parse(value: &str) -> Result<Self, ViewerError> {
        match value {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(ViewerError::InvalidSelection(format!("unknown duration {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    fn days_back(&self) -> u64 {
        match self {
            Period::Day => 0,
            Period::Week => 7,
            Period::Month => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Day { date: NaiveDate, period: Period },
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSelection {
    pub fn day(date: NaiveDate) -> Self {
        DateSelection::Day {
            date,
            period: Period::Day,
        }
    }

    /// Build a selection from query parameters: either `date` (with optional
    /// `duration`) or both `start` and `end`. The selection's window must be
    /// representable.
    pub fn from_params(
        date: Option<&str>,
        duration: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ViewerError> {
        let selection = match (date, start, end) {
            (Some(date), None, None) => DateSelection::Day {
                date: parse_day(date)?,
                period: duration.map(Period::parse).transpose()?.unwrap_or_default(),
            },
            (None, Some(start), Some(end)) => {
                let (start, end) = (parse_day(start)?, parse_day(end)?);
                if end < start {
                    return Err(ViewerError::InvalidSelection(format!(
                        "range end {end} is before start {start}"
                    )));
                }
                DateSelection::Range { start, end }
            }
            _ => {
                return Err(ViewerError::InvalidSelection(
                    "expected either date or start and end".to_string(),
                ));
            }
        };
        selection.window()?;
        Ok(selection)
    }

    /// Half-open UTC window `[from, to)` covered by the selection.
    pub fn window(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ViewerError> {
        let (first, last) = match *self {
            DateSelection::Day { date, period } => (sub_days(date, period.days_back())?, date),
            DateSelection::Range { start, end } => (start, end),
        };
        Ok((midnight(first), midnight(add_days(last, 1)?)))
    }

    /// The selection one day earlier. Fails when its window would leave the
    /// supported calendar.
    pub fn previous(&self) -> Result<Self, ViewerError> {
        self.shift(|d| sub_days(d, 1))
    }

    pub fn next(&self) -> Result<Self, ViewerError> {
        self.shift(|d| add_days(d, 1))
    }

    fn shift(
        &self,
        step: impl Fn(NaiveDate) -> Result<NaiveDate, ViewerError>,
    ) -> Result<Self, ViewerError> {
        let shifted = match *self {
            DateSelection::Day { date, period } => DateSelection::Day {
                date: step(date)?,
                period,
            },
            DateSelection::Range { start, end } => DateSelection::Range {
                start: step(start)?,
                end: step(end)?,
            },
        };
        shifted.window()?;
        Ok(shifted)
    }
}

fn add_days(day: NaiveDate, days: u64) -> Result<NaiveDate, ViewerError> {
    day.checked_add_days(Days::new(days))
        .ok_or_else(|| ViewerError::InvalidSelection(format!("{day} plus {days} day(s) is out of range")))
}

fn sub_days(day: NaiveDate, days: u64) -> Result<NaiveDate, ViewerError> {
    day.checked_sub_days(Days::new(days))
        .ok_or_else(|| ViewerError::InvalidSelection(format!("{day} minus {days} day(s) is out of range")))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (only its UTC date is kept).
pub fn parse_day(value: &str) -> Result<NaiveDate, ViewerError> {
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| ViewerError::InvalidSelection(format!("cannot parse date {value}")))
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_from_params() {
        let sel = DateSelection::from_params(Some("2024-03-01"), None, None, None).unwrap();
        assert_eq!(sel, DateSelection::day(d(2024, 3, 1)));

        let sel = DateSelection::from_params(Some("2024-03-01T10:00:00Z"), Some("week"), None, None).unwrap();
        assert_eq!(sel, DateSelection::Day { date: d(2024, 3, 1), period: Period::Week });

        let sel = DateSelection::from_params(None, None, Some("2024-03-01"), Some("2024-03-04")).unwrap();
        assert_eq!(sel, DateSelection::Range { start: d(2024, 3, 1), end: d(2024, 3, 4) });

        assert!(DateSelection::from_params(None, None, None, None).is_err());
        assert!(DateSelection::from_params(None, None, Some("2024-03-04"), Some("2024-03-01")).is_err());
        assert!(DateSelection::from_params(Some("yesterday"), None, None, None).is_err());
        assert!(DateSelection::from_params(Some("2024-03-01"), Some("year"), None, None).is_err());
    }

    #[test]
    fn test_window() {
        let (from, to) = DateSelection::day(d(2024, 2, 29)).window().unwrap();
        assert_eq!(from.to_rfc3339(), "2024-02-29T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let (from, _) = DateSelection::Day { date: d(2024, 3, 10), period: Period::Week }
            .window()
            .unwrap();
        assert_eq!(from.date_naive(), d(2024, 3, 3));

        let (from, to) = DateSelection::Range { start: d(2024, 1, 30), end: d(2024, 2, 2) }
            .window()
            .unwrap();
        assert_eq!(from.date_naive(), d(2024, 1, 30));
        assert_eq!(to.date_naive(), d(2024, 2, 3));
    }

    #[test]
    fn test_previous_and_next() {
        let sel = DateSelection::day(d(2024, 1, 1));
        assert_eq!(sel.previous().unwrap(), DateSelection::day(d(2023, 12, 31)));
        assert_eq!(sel.next().and_then(|s| s.next()).unwrap(), DateSelection::day(d(2024, 1, 3)));

        let range = DateSelection::Range { start: d(2024, 1, 1), end: d(2024, 1, 5) };
        assert_eq!(
            range.next().unwrap(),
            DateSelection::Range { start: d(2024, 1, 2), end: d(2024, 1, 6) }
        );
    }

    #[test]
    fn test_calendar_edges_are_rejected() {
        // last day has no following midnight, so its window cannot be built
        let last = NaiveDate::MAX.format("%Y-%m-%d").to_string();
        assert!(matches!(
            DateSelection::from_params(Some(&last), None, None, None),
            Err(ViewerError::InvalidSelection(_))
        ));
        assert!(DateSelection::day(NaiveDate::MAX).window().is_err());
        assert!(DateSelection::from_params(None, None, Some("2024-01-01"), Some(&last)).is_err());

        let first = NaiveDate::MIN.format("%Y-%m-%d").to_string();
        assert!(DateSelection::from_params(Some(&first), None, None, None).is_ok());
        assert!(DateSelection::from_params(Some(&first), Some("week"), None, None).is_err());

        let earliest = DateSelection::day(NaiveDate::MIN);
        assert!(matches!(earliest.previous(), Err(ViewerError::InvalidSelection(_))));
        assert!(earliest.next().is_ok());

        let penultimate = DateSelection::day(NaiveDate::MAX.pred_opt().unwrap());
        assert!(penultimate.window().is_ok());
        assert!(penultimate.next().is_err());
    }
}
