use crate::config::SourceConfig;
use crate::history::window_source::WindowSource;
use crate::sources::error::FetchError;
use crate::sources::html::table_rows_by_id;
use crate::sources::http::HttpSource;
use crate::types::weather::{WeatherObservation, WeatherWindow};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};

/// Cells a row needs to carry a full observation: date, min, max, avg, precipitation.
const MIN_CELLS: usize = 5;
const ARCHIVE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Scrapes one window of daily observations from the weather archive.
pub struct WeatherWindowFetcher {
    http: HttpSource,
    url: String,
    window_code: String,
    table_id: String,
}

impl WeatherWindowFetcher {
    pub fn new(http: HttpSource, config: &SourceConfig) -> Self {
        Self {
            http,
            url: config.weather_archive_url.clone(),
            window_code: config.window_code.clone(),
            table_id: config.extremes_table_id.clone(),
        }
    }

    /// The trailing window ending at `end_date`. Its length is fixed by the archive.
    pub async fn fetch_weather_window(
        &self,
        station_id: &str,
        end_date: NaiveDate,
    ) -> Result<WeatherWindow, FetchError> {
        let datum = end_date.format(ARCHIVE_DATE_FORMAT).to_string();
        let body = self
            .http
            .get_text(
                &self.url,
                &[
                    ("id", station_id),
                    ("t", self.window_code.as_str()),
                    ("datum", datum.as_str()),
                ],
            )
            .await?;
        let window = parse_weather_window(&self.url, &body, &self.table_id, end_date)?;
        info!(
            "Station {}: {} observations in window ending {}",
            station_id,
            window.len(),
            end_date
        );
        Ok(window)
    }
}

#[async_trait]
impl WindowSource for WeatherWindowFetcher {
    async fn fetch_window(
        &self,
        station_id: &str,
        end_date: NaiveDate,
    ) -> Result<WeatherWindow, FetchError> {
        self.fetch_weather_window(station_id, end_date).await
    }
}

/// Parses a decimal that may use a comma as separator, e.g. `"12,5"` or `"-0,3"`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let value = normalized.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn parse_row(url: &str, cells: &[String]) -> Result<WeatherObservation, FetchError> {
    let date = NaiveDate::parse_from_str(cells[0].trim(), ARCHIVE_DATE_FORMAT)
        .map_err(|e| FetchError::malformed(url, format!("invalid date '{}': {e}", cells[0])))?;
    let number = |index: usize, field: &str| {
        parse_decimal(&cells[index]).ok_or_else(|| {
            FetchError::malformed(
                url,
                format!("{field} '{}' on {date} is not a number", cells[index]),
            )
        })
    };
    Ok(WeatherObservation {
        date,
        min_temperature: number(1, "min_temperature")?,
        max_temperature: number(2, "max_temperature")?,
        avg_temperature: number(3, "avg_temperature")?,
        precipitation: number(4, "precipitation")?,
    })
}

/// Parses the extremes table of an archive page into a window.
///
/// Rows with fewer than five cells are header or spacer rows and are skipped;
/// any other row that fails to parse aborts the whole window.
pub fn parse_weather_window(
    url: &str,
    html: &str,
    table_id: &str,
    end_date: NaiveDate,
) -> Result<WeatherWindow, FetchError> {
    let rows = table_rows_by_id(url, html, table_id)?;
    let total = rows.len();
    let observations = rows
        .iter()
        .filter(|cells| cells.len() >= MIN_CELLS)
        .map(|cells| parse_row(url, cells))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Kept {} of {} rows from table '{}'",
        observations.len(),
        total,
        table_id
    );
    Ok(WeatherWindow::new(end_date, observations))
}
