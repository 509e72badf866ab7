pub mod assembler;
pub mod window_source;

use crate::history::assembler::{WeatherHistory, WeatherHistoryAssembler};
use crate::history::window_source::WindowSource;
use crate::sources::error::FetchError;
use chrono::NaiveDate;

/// Shorthand for [`WeatherHistoryAssembler::fetch_weather_history`].
pub async fn fetch_weather_history<S: WindowSource + ?Sized>(
    source: &S,
    station_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<WeatherHistory, FetchError> {
    WeatherHistoryAssembler::new(source)
        .fetch_weather_history(station_id, start_date, end_date)
        .await
}
