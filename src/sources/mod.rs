//! The three upstream sources and the HTTP/HTML plumbing they share.

pub mod error;
pub mod html;
pub mod http;
pub mod incidence;
pub mod region_directory;
pub mod weather_window;

use crate::config::SourceConfig;
use crate::sources::error::FetchError;
use crate::sources::http::HttpSource;
use crate::sources::incidence::IncidenceFetcher;
use crate::sources::region_directory::RegionDirectoryFetcher;
use crate::sources::weather_window::WeatherWindowFetcher;

/// All fetchers, wired to one HTTP client built from a [`SourceConfig`].
pub struct Sources {
    pub regions: RegionDirectoryFetcher,
    pub incidence: IncidenceFetcher,
    pub weather: WeatherWindowFetcher,
}

impl Sources {
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let http = HttpSource::new(config)?;
        Ok(Self {
            regions: RegionDirectoryFetcher::new(http.clone(), &config.region_directory_url),
            incidence: IncidenceFetcher::new(http.clone(), &config.incidence_base_url),
            weather: WeatherWindowFetcher::new(http, config),
        })
    }
}
