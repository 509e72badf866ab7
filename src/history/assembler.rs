//! Backward pagination over the weather archive.
//!
//! The archive only serves a fixed trailing window per request, so a longer
//! history is assembled by asking for the window that ends at `end_date`, then
//! for the window ending the day before the earliest date seen so far, and so on
//! until `start_date` is reached.

use crate::history::window_source::WindowSource;
use crate::sources::error::FetchError;
use crate::types::date_range::DateRange;
use crate::types::weather::WeatherObservation;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// A gap-free, duplicate-free run of daily observations covering `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherHistory {
    range: DateRange,
    observations: BTreeMap<NaiveDate, WeatherObservation>,
    windows_fetched: usize,
}

impl WeatherHistory {
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Number of archive windows retrieved to assemble this history.
    pub fn windows_fetched(&self) -> usize {
        self.windows_fetched
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&WeatherObservation> {
        self.observations.get(&date)
    }

    /// Observations in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &WeatherObservation> {
        self.observations.values()
    }

    pub fn as_map(&self) -> &BTreeMap<NaiveDate, WeatherObservation> {
        &self.observations
    }

    pub fn into_map(self) -> BTreeMap<NaiveDate, WeatherObservation> {
        self.observations
    }
}

/// Drives a [`WindowSource`] backward in time until a date range is covered.
pub struct WeatherHistoryAssembler<'a, S: WindowSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: WindowSource + ?Sized> WeatherHistoryAssembler<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Collects every day of `start_date..=end_date` for `station_id`.
    ///
    /// Overlapping windows keep the value fetched first, i.e. the one from the
    /// window closer to `end_date`.
    ///
    /// # Errors
    ///
    /// * [`FetchError::InvalidDateRange`] if `start_date > end_date`.
    /// * [`FetchError::StalledPagination`] if a window comes back empty or the
    ///   earliest known date stops moving backward.
    /// * [`FetchError::MalformedSource`] if the collected windows leave a day of
    ///   the range uncovered.
    /// * Any error of the underlying source, unchanged.
    pub async fn fetch_weather_history(
        &self,
        station_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<WeatherHistory, FetchError> {
        let range = DateRange::new(start_date, end_date).ok_or(FetchError::InvalidDateRange {
            start: start_date,
            end: end_date,
        })?;

        let mut accumulated: BTreeMap<NaiveDate, WeatherObservation> = BTreeMap::new();
        let mut cursor = end_date;
        let mut previous_earliest: Option<NaiveDate> = None;
        let mut windows_fetched = 0;

        loop {
            let window = self.source.fetch_window(station_id, cursor).await?;
            windows_fetched += 1;

            if window.is_empty() {
                warn!(
                    "Empty weather window for station {} ending {}",
                    station_id, cursor
                );
                return Err(stalled(station_id, cursor, "archive returned an empty window"));
            }

            let known = accumulated.len();
            for observation in window.observations {
                accumulated.entry(observation.date).or_insert(observation);
            }
            debug!(
                "Window #{} ending {} added {} new days",
                windows_fetched,
                cursor,
                accumulated.len() - known
            );

            let Some(&earliest) = accumulated.keys().next() else {
                return Err(stalled(station_id, cursor, "no observations accumulated"));
            };
            if earliest <= start_date {
                break;
            }
            if let Some(previous) = previous_earliest {
                if earliest >= previous {
                    warn!(
                        "Weather pagination for station {} is not moving past {}",
                        station_id, previous
                    );
                    return Err(stalled(
                        station_id,
                        cursor,
                        format!("earliest date {earliest} did not move before {previous}"),
                    ));
                }
            }
            previous_earliest = Some(earliest);
            cursor = DateRange::day_before(earliest)
                .ok_or_else(|| stalled(station_id, cursor, "cursor left the calendar"))?;
        }

        accumulated.retain(|date, _| range.contains(*date));

        let missing: Vec<NaiveDate> = range
            .days()
            .filter(|day| !accumulated.contains_key(day))
            .collect();
        if let Some(first_missing) = missing.first() {
            warn!(
                "Weather history for station {} misses {} days in {}",
                station_id,
                missing.len(),
                range
            );
            return Err(FetchError::malformed(
                format!("weather archive for station {station_id}"),
                format!(
                    "{} days of {} are missing, first missing day is {}",
                    missing.len(),
                    range,
                    first_missing
                ),
            ));
        }

        info!(
            "Assembled {} days of weather for station {} from {} windows",
            accumulated.len(),
            station_id,
            windows_fetched
        );
        Ok(WeatherHistory {
            range,
            observations: accumulated,
            windows_fetched,
        })
    }
}

fn stalled(station_id: &str, cursor: NaiveDate, reason: impl Into<String>) -> FetchError {
    FetchError::StalledPagination {
        station: station_id.to_string(),
        cursor,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::weather::WeatherWindow;
    use async_trait::async_trait;
    use chrono::Days;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn observation(date: NaiveDate, avg: f64) -> WeatherObservation {
        WeatherObservation {
            date,
            min_temperature: avg - 3.0,
            max_temperature: avg + 3.0,
            avg_temperature: avg,
            precipitation: 0.5,
        }
    }

    /// Serves `window_len` consecutive days ending at the requested date, with
    /// `avg_temperature` tagged by the call number so overlaps are traceable.
    struct FixedWindowSource {
        window_len: u64,
        calls: Mutex<Vec<NaiveDate>>,
    }

    impl FixedWindowSource {
        fn new(window_len: u64) -> Self {
            Self {
                window_len,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<NaiveDate> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WindowSource for FixedWindowSource {
        async fn fetch_window(
            &self,
            _station_id: &str,
            end_date: NaiveDate,
        ) -> Result<WeatherWindow, FetchError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(end_date);
            let tag = calls.len() as f64;
            let first = end_date - Days::new(self.window_len - 1);
            let observations = first
                .iter_days()
                .take(self.window_len as usize)
                .map(|d| observation(d, tag))
                .collect();
            Ok(WeatherWindow::new(end_date, observations))
        }
    }

    /// Replays a fixed list of windows, one per call, ignoring the cursor.
    struct ScriptedSource {
        windows: Mutex<Vec<Vec<WeatherObservation>>>,
    }

    impl ScriptedSource {
        fn new(mut windows: Vec<Vec<WeatherObservation>>) -> Self {
            windows.reverse();
            Self {
                windows: Mutex::new(windows),
            }
        }
    }

    #[async_trait]
    impl WindowSource for ScriptedSource {
        async fn fetch_window(
            &self,
            _station_id: &str,
            end_date: NaiveDate,
        ) -> Result<WeatherWindow, FetchError> {
            let next = self.windows.lock().unwrap().pop().unwrap_or_default();
            Ok(WeatherWindow::new(end_date, next))
        }
    }

    fn days(from: NaiveDate, to: NaiveDate, avg: f64) -> Vec<WeatherObservation> {
        DateRange::new(from, to)
            .unwrap()
            .days()
            .map(|d| observation(d, avg))
            .collect()
    }

    #[tokio::test]
    async fn test_history_covers_every_day_once() {
        let source = FixedWindowSource::new(56);
        let start = date(2020, 3, 1);
        let end = date(2020, 11, 15);
        let history = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", start, end)
            .await
            .unwrap();

        let range = DateRange::new(start, end).unwrap();
        assert_eq!(history.len(), range.num_days());
        let dates: Vec<NaiveDate> = history.iter().map(|o| o.date).collect();
        assert_eq!(dates, range.days().collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_terminates_after_ceil_days_over_window_calls() {
        for (days_requested, window_len) in [(8u64, 8u64), (56, 56), (112, 56), (113, 56), (200, 56), (30, 7)] {
            let source = FixedWindowSource::new(window_len);
            let end = date(2021, 2, 28);
            let start = end - Days::new(days_requested - 1);
            let history = WeatherHistoryAssembler::new(&source)
                .fetch_weather_history("10554", start, end)
                .await
                .unwrap();
            let expected = days_requested.div_ceil(window_len) as usize;
            assert_eq!(history.windows_fetched(), expected, "{days_requested} days / {window_len}");
            assert_eq!(source.calls().len(), expected);
        }
    }

    #[tokio::test]
    async fn test_cursor_walks_to_day_before_earliest() {
        let source = FixedWindowSource::new(56);
        let end = date(2020, 6, 30);
        WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 3, 1), end)
            .await
            .unwrap();
        let calls = source.calls();
        assert_eq!(calls[0], end);
        for pair in calls.windows(2) {
            assert_eq!(pair[1], pair[0] - Days::new(56));
        }
    }

    #[tokio::test]
    async fn test_first_write_wins_on_overlap() {
        // The second window overlaps the first by two days with different values.
        let source = ScriptedSource::new(vec![
            days(date(2020, 3, 10), date(2020, 3, 20), 1.0),
            days(date(2020, 3, 1), date(2020, 3, 11), 2.0),
        ]);
        let history = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 3, 1), date(2020, 3, 20))
            .await
            .unwrap();

        assert_eq!(history.get(date(2020, 3, 10)).unwrap().avg_temperature, 1.0);
        assert_eq!(history.get(date(2020, 3, 11)).unwrap().avg_temperature, 1.0);
        assert_eq!(history.get(date(2020, 3, 9)).unwrap().avg_temperature, 2.0);
        assert_eq!(history.windows_fetched(), 2);
    }

    #[tokio::test]
    async fn test_empty_window_stalls() {
        let source = ScriptedSource::new(vec![days(date(2020, 3, 10), date(2020, 3, 20), 1.0), vec![]]);
        let err = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 1, 1), date(2020, 3, 20))
            .await
            .unwrap_err();
        match err {
            FetchError::StalledPagination { cursor, .. } => assert_eq!(cursor, date(2020, 3, 9)),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_repeated_window_stalls() {
        let window = days(date(2020, 3, 10), date(2020, 3, 20), 1.0);
        let source = ScriptedSource::new(vec![window.clone(), window.clone(), window]);
        let err = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 1, 1), date(2020, 3, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::StalledPagination { .. }));
    }

    #[tokio::test]
    async fn test_gap_inside_range_is_malformed() {
        let mut window = days(date(2020, 3, 1), date(2020, 3, 20), 1.0);
        window.retain(|o| o.date != date(2020, 3, 5));
        let source = ScriptedSource::new(vec![window]);
        let err = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 3, 1), date(2020, 3, 20))
            .await
            .unwrap_err();
        match err {
            FetchError::MalformedSource { message, .. } => {
                assert!(message.contains("2020-03-05"), "{message}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_days_outside_range_are_dropped() {
        let source = ScriptedSource::new(vec![days(date(2020, 3, 15), date(2020, 3, 30), 1.0)]);
        let history = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 3, 20), date(2020, 3, 27))
            .await
            .unwrap();
        assert_eq!(history.len(), 8);
        assert_eq!(history.iter().next().unwrap().date, date(2020, 3, 20));
        assert_eq!(history.iter().last().unwrap().date, date(2020, 3, 27));
    }

    #[tokio::test]
    async fn test_reversed_range_is_rejected_without_fetching() {
        let source = FixedWindowSource::new(56);
        let err = WeatherHistoryAssembler::new(&source)
            .fetch_weather_history("10554", date(2020, 3, 27), date(2020, 3, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidDateRange { .. }));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        struct Failing;

        #[async_trait]
        impl WindowSource for Failing {
            async fn fetch_window(&self, station_id: &str, _: NaiveDate) -> Result<WeatherWindow, FetchError> {
                Err(FetchError::malformed(station_id, "no table"))
            }
        }

        let err = WeatherHistoryAssembler::new(&Failing)
            .fetch_weather_history("10554", date(2020, 3, 20), date(2020, 3, 27))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::MalformedSource { .. }));
    }
}
