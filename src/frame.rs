//! Tabular views of the fetched series and their CSV persistence.

use crate::error::CoronaWeatherError;
use crate::history::assembler::WeatherHistory;
use crate::types::incidence::IncidenceObservation;
use crate::types::joined::JoinedRecord;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Columns of the joined table, in output order.
pub const JOINED_COLUMNS: [&str; 7] = [
    "date",
    "incidence",
    "min_temperature",
    "max_temperature",
    "avg_temperature",
    "precipitation",
    "day",
];

/// The joined incidence/weather table as a polars `DataFrame`.
///
/// `date` is a `Date` column, `day` is `Int64` and every other column is `Float64`.
#[derive(Debug, Clone)]
pub struct JoinedFrame {
    /// The underlying frame, one row per joined date in ascending order.
    pub frame: DataFrame,
}

impl JoinedFrame {
    pub fn from_records(records: &[JoinedRecord]) -> PolarsResult<Self> {
        let frame = df!(
            "date" => records.iter().map(|r| r.date).collect::<Vec<_>>(),
            "incidence" => records.iter().map(|r| r.incidence).collect::<Vec<_>>(),
            "min_temperature" => records.iter().map(|r| r.min_temperature).collect::<Vec<_>>(),
            "max_temperature" => records.iter().map(|r| r.max_temperature).collect::<Vec<_>>(),
            "avg_temperature" => records.iter().map(|r| r.avg_temperature).collect::<Vec<_>>(),
            "precipitation" => records.iter().map(|r| r.precipitation).collect::<Vec<_>>(),
            "day" => records.iter().map(|r| r.day as i64).collect::<Vec<_>>(),
        )?;
        Ok(Self { frame })
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Writes the table as comma separated values with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<(), CoronaWeatherError> {
        write_csv(&mut self.frame.clone(), path)
    }

    /// Reads a table previously written by [`JoinedFrame::write_csv`].
    pub fn read_csv(path: &Path) -> Result<Self, CoronaWeatherError> {
        if !path.is_file() {
            return Err(CoronaWeatherError::InputFile(
                path.to_path_buf(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            ));
        }
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let mut conversions = vec![col("date").str().to_date(StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            ..Default::default()
        })];
        conversions.extend(
            JOINED_COLUMNS[1..6]
                .iter()
                .map(|name| col(*name).cast(DataType::Float64)),
        );
        conversions.push(col("day").cast(DataType::Int64));

        let frame = raw
            .lazy()
            .with_columns(conversions)
            .select(JOINED_COLUMNS.iter().map(|name| col(*name)).collect::<Vec<_>>())
            .collect()?;
        Ok(Self { frame })
    }
}

/// One row per day: `date, incidence`.
pub fn incidence_frame(series: &[IncidenceObservation]) -> PolarsResult<DataFrame> {
    df!(
        "date" => series.iter().map(|o| o.date).collect::<Vec<_>>(),
        "incidence" => series.iter().map(|o| o.incidence).collect::<Vec<_>>(),
    )
}

/// One row per day: `date, min_temperature, max_temperature, avg_temperature, precipitation`.
pub fn weather_frame(history: &WeatherHistory) -> PolarsResult<DataFrame> {
    df!(
        "date" => history.iter().map(|o| o.date).collect::<Vec<_>>(),
        "min_temperature" => history.iter().map(|o| o.min_temperature).collect::<Vec<_>>(),
        "max_temperature" => history.iter().map(|o| o.max_temperature).collect::<Vec<_>>(),
        "avg_temperature" => history.iter().map(|o| o.avg_temperature).collect::<Vec<_>>(),
        "precipitation" => history.iter().map(|o| o.precipitation).collect::<Vec<_>>(),
    )
}

/// Writes any frame to `path` as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), CoronaWeatherError> {
    let mut file =
        File::create(path).map_err(|e| CoronaWeatherError::OutputFile(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
