//! Main entry point: fetches the three sources and joins them into one table.

use crate::config::{SourceConfig, DEFAULT_REGION_CODE, DEFAULT_STATION_ID};
use crate::error::CoronaWeatherError;
use crate::frame::JoinedFrame;
use crate::history::assembler::{WeatherHistory, WeatherHistoryAssembler};
use crate::history::window_source::WindowSource;
use crate::join::join;
use crate::sources::error::FetchError;
use crate::sources::Sources;
use crate::types::incidence::IncidenceObservation;
use crate::types::joined::{DayOrder, JoinedRecord};
use crate::types::region::RegionDirectory;
use crate::types::weather::WeatherWindow;
use bon::bon;
use chrono::NaiveDate;
use log::info;

/// Client for the region directory, the incidence API and the weather archive.
///
/// # Examples
///
/// ```no_run
/// # use corona_weather::{CoronaWeather, CoronaWeatherError};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), CoronaWeatherError> {
/// let client = CoronaWeather::new()?;
/// let joined = client
///     .joined()
///     .region_code("16053")
///     .station("10554")
///     .start(NaiveDate::from_ymd_opt(2020, 3, 20).unwrap())
///     .call()
///     .await?;
/// println!("{}", joined.frame);
/// # Ok(())
/// # }
/// ```
pub struct CoronaWeather {
    sources: Sources,
}

#[bon]
impl CoronaWeather {
    /// Client with default endpoints and headers.
    pub fn new() -> Result<Self, CoronaWeatherError> {
        Self::with_config(&SourceConfig::default())
    }

    pub fn with_config(config: &SourceConfig) -> Result<Self, CoronaWeatherError> {
        Ok(Self {
            sources: Sources::new(config)?,
        })
    }

    pub async fn regions(&self) -> Result<RegionDirectory, CoronaWeatherError> {
        Ok(self.sources.regions.fetch_region_directory().await?)
    }

    pub async fn incidence(
        &self,
        region_code: &str,
    ) -> Result<Vec<IncidenceObservation>, CoronaWeatherError> {
        Ok(self.sources.incidence.fetch_incidence(region_code).await?)
    }

    pub async fn weather_window(
        &self,
        station: &str,
        end_date: NaiveDate,
    ) -> Result<WeatherWindow, CoronaWeatherError> {
        Ok(self
            .sources
            .weather
            .fetch_weather_window(station, end_date)
            .await?)
    }

    /// Daily weather for every day of `start..=end`, paging backward through the archive.
    ///
    /// `station` defaults to Erfurt-Weimar (`10554`).
    #[builder]
    pub async fn weather_history(
        &self,
        station: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeatherHistory, CoronaWeatherError> {
        let station = station.unwrap_or(DEFAULT_STATION_ID);
        Ok(WeatherHistoryAssembler::new(&self.sources.weather)
            .fetch_weather_history(station, start, end)
            .await?)
    }

    /// Fetches incidence and weather and joins them on date.
    ///
    /// * `.region_code(&str)`: district to query, defaults to `16053`.
    /// * `.station(&str)`: weather station, defaults to `10554`.
    /// * `.start(NaiveDate)`: **Required.** First day of the weather history.
    /// * `.end(NaiveDate)`: Last day; defaults to the latest incidence date.
    /// * `.day_order(DayOrder)`: numbering of the `day` column, newest first by default.
    ///
    /// # Errors
    ///
    /// Any [`FetchError`] of the incidence or weather retrieval, or a polars error
    /// while building the frame.
    #[builder]
    pub async fn joined(
        &self,
        region_code: Option<&str>,
        station: Option<&str>,
        start: NaiveDate,
        end: Option<NaiveDate>,
        day_order: Option<DayOrder>,
    ) -> Result<JoinedFrame, CoronaWeatherError> {
        let region_code = region_code.unwrap_or(DEFAULT_REGION_CODE);
        let station = station.unwrap_or(DEFAULT_STATION_ID);

        let incidence = self.sources.incidence.fetch_incidence(region_code).await?;
        let records = join_with_weather(
            &self.sources.weather,
            station,
            &incidence,
            start,
            end,
            day_order.unwrap_or_default(),
        )
        .await?;
        Ok(JoinedFrame::from_records(&records)?)
    }
}

/// Assembles the weather history for `start..=end` and joins it with `incidence`.
///
/// Without an explicit `end` the latest incidence date is used.
pub async fn join_with_weather<S: WindowSource + ?Sized>(
    window_source: &S,
    station: &str,
    incidence: &[IncidenceObservation],
    start: NaiveDate,
    end: Option<NaiveDate>,
    day_order: DayOrder,
) -> Result<Vec<JoinedRecord>, FetchError> {
    let end = match end {
        Some(end) => end,
        None => incidence.iter().map(|o| o.date).max().ok_or_else(|| {
            FetchError::malformed("incidence history", "no values to derive an end date from")
        })?,
    };
    info!(
        "Joining station {} weather with incidence for {}..={}",
        station, start, end
    );

    let history = WeatherHistoryAssembler::new(window_source)
        .fetch_weather_history(station, start, end)
        .await?;
    Ok(join(history.as_map(), incidence, day_order))
}
