//! Aligns the incidence series with the weather history on calendar date.
//!
//! The join is an inner join: incidence and weather usually cover different
//! ranges natively, and only days present in both sources make it into the
//! output table.

use crate::types::incidence::IncidenceObservation;
use crate::types::joined::{DayOrder, JoinedRecord};
use crate::types::weather::WeatherObservation;
use chrono::NaiveDate;
use log::info;
use std::collections::BTreeMap;

/// Joins `weather` and `incidence` on date, ascending, and numbers the rows
/// according to `order`. Returns an empty vector when no date is shared.
pub fn join(
    weather: &BTreeMap<NaiveDate, WeatherObservation>,
    incidence: &[IncidenceObservation],
    order: DayOrder,
) -> Vec<JoinedRecord> {
    let mut joined: Vec<JoinedRecord> = incidence
        .iter()
        .filter_map(|inc| {
            weather.get(&inc.date).map(|wx| JoinedRecord {
                date: inc.date,
                incidence: inc.incidence,
                min_temperature: wx.min_temperature,
                max_temperature: wx.max_temperature,
                avg_temperature: wx.avg_temperature,
                precipitation: wx.precipitation,
                day: 0,
            })
        })
        .collect();
    joined.sort_by_key(|r| r.date);
    joined.dedup_by_key(|r| r.date);

    let count = joined.len() as u32;
    for (index, record) in joined.iter_mut().enumerate() {
        let index = index as u32;
        record.day = match order {
            DayOrder::OldestFirst => index + 1,
            DayOrder::NewestFirst => count - index,
        };
    }

    info!(
        "Joined {} weather days with {} incidence values into {} rows",
        weather.len(),
        incidence.len(),
        joined.len()
    );
    joined
}
