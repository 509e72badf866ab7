//! Endpoints and request settings shared by all fetchers.
//!
//! Everything a fetcher needs to know about its upstream source lives in one
//! [`SourceConfig`] value that is handed to [`crate::Sources::new`]; there is no
//! global client or header state.

use bon::Builder;
use std::time::Duration;

pub const DEFAULT_REGION_DIRECTORY_URL: &str =
    "https://statistik.thueringen.de/datenbank/gemauswahl.asp";
pub const DEFAULT_INCIDENCE_BASE_URL: &str = "https://api.corona-zahlen.org";
pub const DEFAULT_WEATHER_ARCHIVE_URL: &str =
    "https://www.wetterkontor.de/de/wetter/deutschland/extremwerte.asp";
/// Archive code for the eight-week window.
pub const DEFAULT_WINDOW_CODE: &str = "8";
pub const DEFAULT_EXTREMES_TABLE_ID: &str = "extremwerte";
/// Thuringia district queried when no region code is given.
pub const DEFAULT_REGION_CODE: &str = "16053";
/// Erfurt-Weimar weather station.
pub const DEFAULT_STATION_ID: &str = "10554";

/// Settings for the three upstream sources.
///
/// # Examples
///
/// ```
/// use corona_weather::SourceConfig;
/// use std::time::Duration;
///
/// let config = SourceConfig::builder()
///     .user_agent("my-analysis/1.0 (me@example.org)")
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.window_code, "8");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SourceConfig {
    /// Sent as `User-Agent` with every request.
    #[builder(into, default = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string())]
    pub user_agent: String,

    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,

    #[builder(into, default = DEFAULT_REGION_DIRECTORY_URL.to_string())]
    pub region_directory_url: String,

    /// Base of the incidence API; `/districts/{code}/history/incidence` is appended.
    #[builder(into, default = DEFAULT_INCIDENCE_BASE_URL.to_string())]
    pub incidence_base_url: String,

    #[builder(into, default = DEFAULT_WEATHER_ARCHIVE_URL.to_string())]
    pub weather_archive_url: String,

    /// Value of the archive's window-length query parameter (`t`).
    #[builder(into, default = DEFAULT_WINDOW_CODE.to_string())]
    pub window_code: String,

    /// `id` attribute of the archive table holding the daily extremes.
    #[builder(into, default = DEFAULT_EXTREMES_TABLE_ID.to_string())]
    pub extremes_table_id: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::builder().build()
    }
}
