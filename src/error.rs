use crate::sources::error::FetchError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoronaWeatherError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed processing DataFrame: {0}")]
    Frame(#[from] PolarsError),

    #[error("Failed to write output file '{0}'")]
    OutputFile(PathBuf, #[source] std::io::Error),

    #[error("Failed to read input file '{0}'")]
    InputFile(PathBuf, #[source] std::io::Error),

    #[error("Invalid chart: {0}")]
    InvalidChart(String),
}
