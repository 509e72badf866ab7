use crate::sources::error::FetchError;
use crate::types::weather::WeatherWindow;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Anything that can hand out the weather window ending at a given date.
///
/// The archive scraper implements this; tests and benchmarks substitute scripted
/// sources so pagination can be exercised without network access.
#[async_trait]
pub trait WindowSource {
    async fn fetch_window(
        &self,
        station_id: &str,
        end_date: NaiveDate,
    ) -> Result<WeatherWindow, FetchError>;
}
