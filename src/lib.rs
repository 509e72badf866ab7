mod config;
mod corona_weather;
mod error;
mod frame;
mod history;
mod join;
mod presenter;
mod sources;
mod types;

pub use config::*;
pub use corona_weather::*;
pub use error::CoronaWeatherError;

pub use frame::{incidence_frame, weather_frame, write_csv, JoinedFrame, JOINED_COLUMNS};
pub use history::assembler::{WeatherHistory, WeatherHistoryAssembler};
pub use history::fetch_weather_history;
pub use history::window_source::WindowSource;
pub use join::join;
pub use presenter::{render, ChartAxis, ChartLayout, ChartSpec};

pub use sources::error::FetchError;
pub use sources::incidence::{parse_incidence, IncidenceFetcher};
pub use sources::region_directory::{parse_region_directory, RegionDirectoryFetcher};
pub use sources::weather_window::{parse_decimal, parse_weather_window, WeatherWindowFetcher};
pub use sources::http::HttpSource;
pub use sources::Sources;

pub use types::date_range::DateRange;
pub use types::incidence::IncidenceObservation;
pub use types::joined::{DayOrder, JoinedRecord};
pub use types::region::{RegionDirectory, RegionRecord};
pub use types::weather::{WeatherObservation, WeatherWindow};
