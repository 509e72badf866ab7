//! Chart description and rendering for the joined table.
//!
//! [`ChartSpec`] is always available and checks a chart against a frame;
//! drawing needs the `plotting` feature, which pulls in `plotlars`.

use crate::error::CoronaWeatherError;
use crate::frame::JoinedFrame;
use polars::prelude::*;

/// How several value columns share the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartLayout {
    /// First column on the left axis, remaining columns on a right axis.
    #[default]
    DualAxis,
    /// One chart per column, all on the same x axis.
    Faceted,
}

/// Column used for the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartAxis {
    #[default]
    Date,
    Day,
}

impl ChartAxis {
    pub fn column(&self) -> &'static str {
        match self {
            ChartAxis::Date => "date",
            ChartAxis::Day => "day",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub layout: ChartLayout,
    pub x: ChartAxis,
    pub columns: Vec<String>,
    pub title: String,
}

impl ChartSpec {
    pub fn new(layout: ChartLayout, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            layout,
            x: ChartAxis::default(),
            columns: columns.into_iter().map(Into::into).collect(),
            title: "Incidence and weather".to_string(),
        }
    }

    pub fn with_x(mut self, x: ChartAxis) -> Self {
        self.x = x;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Incidence against average temperature on two y axes.
    pub fn incidence_vs_temperature() -> Self {
        Self::new(ChartLayout::DualAxis, ["incidence", "avg_temperature"])
    }

    /// Checks that the chart can be drawn from `frame`: at least two value
    /// columns, each present, numeric, distinct and not the x column.
    pub fn validate(&self, frame: &DataFrame) -> Result<(), CoronaWeatherError> {
        if self.columns.len() < 2 {
            return Err(CoronaWeatherError::InvalidChart(format!(
                "need at least two value columns, got {}",
                self.columns.len()
            )));
        }
        if frame.column(self.x.column()).is_err() {
            return Err(CoronaWeatherError::InvalidChart(format!(
                "x column '{}' is missing",
                self.x.column()
            )));
        }
        for (i, name) in self.columns.iter().enumerate() {
            if name == self.x.column() {
                return Err(CoronaWeatherError::InvalidChart(format!(
                    "'{name}' is already the x axis"
                )));
            }
            if self.columns[..i].contains(name) {
                return Err(CoronaWeatherError::InvalidChart(format!(
                    "'{name}' is listed twice"
                )));
            }
            let column = frame.column(name).map_err(|_| {
                CoronaWeatherError::InvalidChart(format!("column '{name}' is missing"))
            })?;
            if !matches!(
                column.dtype(),
                DataType::Float64
                    | DataType::Float32
                    | DataType::Int64
                    | DataType::Int32
                    | DataType::UInt64
                    | DataType::UInt32
            ) {
                return Err(CoronaWeatherError::InvalidChart(format!(
                    "column '{name}' is {} and cannot be plotted",
                    column.dtype()
                )));
            }
        }
        Ok(())
    }
}

/// Validates `spec` against `joined` and opens the chart(s) in the browser.
#[cfg(feature = "plotting")]
pub fn render(joined: &JoinedFrame, spec: &ChartSpec) -> Result<(), CoronaWeatherError> {
    use plotlars::{Axis, AxisSide, Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};

    spec.validate(&joined.frame)?;
    let palette = [
        Rgb(235, 117, 0),
        Rgb(69, 157, 230),
        Rgb(90, 170, 90),
        Rgb(200, 60, 60),
        Rgb(140, 100, 190),
    ];

    match spec.layout {
        ChartLayout::DualAxis => {
            let (primary, secondary) = spec.columns.split_at(1);
            let secondary_title = secondary.join(", ");
            TimeSeriesPlot::builder()
                .data(&joined.frame)
                .x(spec.x.column())
                .y(primary[0].as_str())
                .additional_series(secondary.iter().map(String::as_str).collect())
                .colors(palette.iter().cycle().take(spec.columns.len()).cloned().collect())
                .lines(vec![Line::Solid; spec.columns.len()])
                .plot_title(Text::from(spec.title.as_str()).size(18))
                .legend(&Legend::new().x(0.05).y(0.9))
                .x_title(spec.x.column())
                .y_title(Text::from(primary[0].as_str()).color(Rgb(0, 0, 0)))
                .y_title2(Text::from(secondary_title.as_str()).color(Rgb(0, 0, 0)))
                .y_axis(&Axis::new().value_color(Rgb(0, 0, 0)).show_grid(false))
                .y_axis2(
                    &Axis::new()
                        .axis_side(AxisSide::Right)
                        .value_color(Rgb(0, 0, 0))
                        .show_grid(false),
                )
                .build()
                .plot();
        }
        ChartLayout::Faceted => {
            for (name, color) in spec.columns.iter().zip(palette.iter().cycle()) {
                let title = format!("{}: {}", spec.title, name);
                TimeSeriesPlot::builder()
                    .data(&joined.frame)
                    .x(spec.x.column())
                    .y(name.as_str())
                    .colors(vec![color.clone()])
                    .plot_title(Text::from(title.as_str()).size(16))
                    .x_title(spec.x.column())
                    .y_title(name.as_str())
                    .build()
                    .plot();
            }
        }
    }
    Ok(())
}

/// Without the `plotting` feature only validation is possible.
#[cfg(not(feature = "plotting"))]
pub fn render(joined: &JoinedFrame, spec: &ChartSpec) -> Result<(), CoronaWeatherError> {
    spec.validate(&joined.frame)?;
    Err(CoronaWeatherError::InvalidChart(
        "built without the `plotting` feature".to_string(),
    ))
}
