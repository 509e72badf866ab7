//! Daily weather observations as scraped from the station archive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of weather at a station.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub min_temperature: f64, // °C
    pub max_temperature: f64, // °C
    pub avg_temperature: f64, // °C
    pub precipitation: f64,   // mm
}

/// The observations returned by a single archive retrieval.
///
/// The archive always answers with the trailing window (eight weeks) that ends at
/// `end_date`; days the station did not report are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherWindow {
    /// The end date the window was requested for.
    pub end_date: NaiveDate,
    /// Observations in ascending date order.
    pub observations: Vec<WeatherObservation>,
}

impl WeatherWindow {
    pub fn new(end_date: NaiveDate, mut observations: Vec<WeatherObservation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self {
            end_date,
            observations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn earliest(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }
}
