use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    // Transport failures and non-success statuses alike
    #[error("Source unavailable: {url}")]
    SourceUnavailable {
        url: String,
        status: Option<reqwest::StatusCode>,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed data from {location}: {message}")]
    MalformedSource { location: String, message: String },

    #[error("Region code '{0}' is not present in the incidence response")]
    UnknownRegion(String),

    #[error("Region code must not be empty")]
    InvalidRegionCode,

    #[error("Start date {start} lies after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Weather pagination for station '{station}' stalled at cursor {cursor}: {reason}")]
    StalledPagination {
        station: String,
        cursor: NaiveDate,
        reason: String,
    },
}

impl FetchError {
    pub(crate) fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::MalformedSource {
            location: location.into(),
            message: message.into(),
        }
    }
}
