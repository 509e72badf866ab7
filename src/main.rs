use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use corona_weather::{
    incidence_frame, render, weather_frame, write_csv, ChartAxis, ChartLayout, ChartSpec,
    CoronaWeather, CoronaWeatherError, DayOrder, JoinedFrame, SourceConfig, DEFAULT_REGION_CODE,
    DEFAULT_STATION_ID,
};
use log::info;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Correlate a district's COVID-19 incidence with daily weather observations.
#[derive(Debug, Parser)]
#[command(name = "corona-weather", version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Override the region directory page
    #[arg(long, global = true)]
    region_directory_url: Option<String>,

    /// Override the weather archive page
    #[arg(long, global = true)]
    weather_archive_url: Option<String>,

    /// Override the incidence API base URL
    #[arg(long, global = true)]
    incidence_base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print or save the region directory
    Regions {
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print or save a district's incidence history
    Incidence {
        #[arg(short, long, default_value = DEFAULT_REGION_CODE)]
        region: String,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print or save daily weather for a date range
    Weather {
        #[arg(short, long, default_value = DEFAULT_STATION_ID)]
        station: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Join incidence and weather into one table
    Join {
        #[arg(short, long, default_value = DEFAULT_REGION_CODE)]
        region: String,
        #[arg(short, long, default_value = DEFAULT_STATION_ID)]
        station: String,
        #[arg(long)]
        start: NaiveDate,
        /// Defaults to the latest incidence date
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = OrderArg::Newest)]
        order: OrderArg,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Open a chart of the joined table
        #[arg(long)]
        plot: bool,
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Chart a joined table saved by `join --output`
    Plot {
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,
        #[command(flatten)]
        chart: ChartArgs,
    },
}

#[derive(Debug, Args)]
struct ChartArgs {
    #[arg(long, value_enum, default_value_t = LayoutArg::Dual)]
    layout: LayoutArg,
    #[arg(long, value_enum, default_value_t = AxisArg::Date)]
    x: AxisArg,
    /// Value columns to draw
    #[arg(long, value_delimiter = ',', default_values = ["incidence", "avg_temperature"])]
    columns: Vec<String>,
}

impl ChartArgs {
    fn spec(&self) -> ChartSpec {
        let layout = match self.layout {
            LayoutArg::Dual => ChartLayout::DualAxis,
            LayoutArg::Faceted => ChartLayout::Faceted,
        };
        let x = match self.x {
            AxisArg::Date => ChartAxis::Date,
            AxisArg::Day => ChartAxis::Day,
        };
        ChartSpec::new(layout, self.columns.iter().cloned()).with_x(x)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Dual,
    Faceted,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    Date,
    Day,
}

fn setup_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("corona_weather={level}")));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn source_config(args: &SourceArgs) -> SourceConfig {
    SourceConfig::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .maybe_user_agent(args.user_agent.clone())
        .maybe_region_directory_url(args.region_directory_url.clone())
        .maybe_weather_archive_url(args.weather_archive_url.clone())
        .maybe_incidence_base_url(args.incidence_base_url.clone())
        .build()
}

fn emit(mut frame: DataFrame, output: Option<&Path>) -> Result<(), CoronaWeatherError> {
    match output {
        Some(path) => write_csv(&mut frame, path),
        None => {
            println!("{frame}");
            Ok(())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CoronaWeatherError> {
    if let Command::Plot { input, chart } = &cli.command {
        let joined = JoinedFrame::read_csv(input)?;
        return render(&joined, &chart.spec());
    }

    let client = CoronaWeather::with_config(&source_config(&cli.source))?;
    match cli.command {
        Command::Regions { output } => {
            let directory = client.regions().await?;
            emit(directory.to_frame()?, output.as_deref())
        }
        Command::Incidence { region, output } => {
            let series = client.incidence(&region).await?;
            emit(incidence_frame(&series)?, output.as_deref())
        }
        Command::Weather {
            station,
            start,
            end,
            output,
        } => {
            let history = client
                .weather_history()
                .station(&station)
                .start(start)
                .end(end)
                .call()
                .await?;
            emit(weather_frame(&history)?, output.as_deref())
        }
        Command::Join {
            region,
            station,
            start,
            end,
            order,
            output,
            plot,
            chart,
        } => {
            let day_order = match order {
                OrderArg::Newest => DayOrder::NewestFirst,
                OrderArg::Oldest => DayOrder::OldestFirst,
            };
            let joined = client
                .joined()
                .region_code(&region)
                .station(&station)
                .start(start)
                .maybe_end(end)
                .day_order(day_order)
                .call()
                .await?;
            info!("Joined table has {} rows", joined.height());
            if plot {
                render(&joined, &chart.spec())?;
            }
            emit(joined.frame, output.as_deref())
        }
        Command::Plot { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
