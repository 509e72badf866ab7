use chrono::{Days, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// An inclusive span of calendar days, `start..=end`.
///
/// Construction through [`DateRange::new`] guarantees `start <= end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `start` lies after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// The day before `date`, if representable.
    pub(crate) fn day_before(date: NaiveDate) -> Option<NaiveDate> {
        date.checked_sub_days(Days::new(1))
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_reversed_bounds() {
        assert!(DateRange::new(date(2020, 3, 27), date(2020, 3, 20)).is_none());
        assert!(DateRange::new(date(2020, 3, 20), date(2020, 3, 20)).is_some());
    }

    #[test]
    fn test_num_days_is_inclusive() {
        let range = DateRange::new(date(2020, 3, 20), date(2020, 3, 27)).unwrap();
        assert_eq!(range.num_days(), 8);
        assert_eq!(range.days().count(), 8);
        assert_eq!(range.days().last(), Some(date(2020, 3, 27)));
    }

    #[test]
    fn test_days_cross_leap_day() {
        let range = DateRange::new(date(2020, 2, 27), date(2020, 3, 1)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![date(2020, 2, 27), date(2020, 2, 28), date(2020, 2, 29), date(2020, 3, 1)]
        );
        assert!(range.contains(date(2020, 2, 29)));
        assert!(!range.contains(date(2020, 3, 2)));
    }
}
