use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use columnar::graph::{Figure, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use columnar::output::{Chart, OutputMode, Rendered};
use columnar::plots;
use columnar::stats::{
    BoxStats, ColumnMap, CorrelationMatrix, FreqEntry, HistBin, MissingValues, ScatterData,
};
use columnar::{apply, Series, Value};
use serde::de::DeserializeOwned;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "columnar")]
#[command(about = "Chart column statistics and apply per-column functions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart from statistics JSON read on stdin
    Plot(PlotArgs),
    /// Apply a function to a series JSON ({"name", "values"}) read on stdin
    Apply(ApplyArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartKind {
    Hist,
    Freq,
    Box,
    Scatter,
    Missing,
    Correlation,
}

#[derive(clap::Args, Debug)]
struct PlotArgs {
    #[arg(value_enum, help = "Chart to render")]
    kind: ChartKind,

    #[arg(
        short = 'o',
        long = "output",
        help = "Output mode: image, base64 or anything else to discard (raw PNG on stdout when omitted)"
    )]
    output: Option<String>,

    #[arg(short = 'p', long = "path", help = "File written by the image output mode")]
    path: Option<PathBuf>,

    #[arg(long = "sub-title", default_value = "", help = "Histogram caption suffix")]
    sub_title: String,

    #[arg(long = "width", help = "Output width in pixels")]
    width: Option<u32>,

    #[arg(long = "height", help = "Output height in pixels")]
    height: Option<u32>,
}

#[derive(clap::Args, Debug)]
struct ApplyArgs {
    #[arg(help = "Function name, e.g. mean, clip, replace_words")]
    function: String,

    #[arg(
        allow_hyphen_values = true,
        help = "Positional arguments; JSON literals are parsed, anything else is text"
    )]
    args: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;

    match cli.command {
        Command::Plot(args) => run_plot(args, &input),
        Command::Apply(args) => run_apply(args, &input),
    }
}

fn run_plot(args: PlotArgs, input: &str) -> Result<()> {
    let chart = render(&args, input).context("Failed to generate chart")?;

    let Some(name) = args.output.as_deref() else {
        return write_stdout(&chart.png);
    };
    let mode = OutputMode::from_name(name, args.path.as_deref())?;
    match chart.emit(&mode)? {
        Rendered::Base64(encoded) => write_stdout(encoded.as_bytes()),
        Rendered::Written(path) => {
            tracing::info!(path = %path.display(), "chart written");
            Ok(())
        }
        Rendered::Nothing => Ok(()),
    }
}

fn render(args: &PlotArgs, input: &str) -> Result<Chart> {
    let figure = figure_for(args);
    match args.kind {
        ChartKind::Hist => {
            let data: ColumnMap<Vec<HistBin>> = parse(input)?;
            let (name, bins) = plots::first_column(&data, "Histogram")?;
            plots::hist_chart(name, bins, &args.sub_title, figure)
        }
        ChartKind::Freq => {
            let data: ColumnMap<Vec<FreqEntry>> = parse(input)?;
            let (name, entries) = plots::first_column(&data, "Frequency")?;
            plots::freq_chart(name, entries, figure)
        }
        ChartKind::Box => {
            let data: ColumnMap<Vec<BoxStats>> = parse(input)?;
            let (name, boxes) = plots::first_column(&data, "Boxplot")?;
            plots::boxplot_chart(name, boxes, figure)
        }
        ChartKind::Scatter => plots::scatter_chart(&parse::<ScatterData>(input)?, figure),
        ChartKind::Missing => plots::missing_values_chart(&parse::<MissingValues>(input)?, figure),
        ChartKind::Correlation => {
            plots::correlation_chart(&parse::<CorrelationMatrix>(input)?, figure)
        }
    }
}

/// Heatmaps default to a square figure
fn figure_for(args: &PlotArgs) -> Figure {
    let (width, height) = match args.kind {
        ChartKind::Correlation => {
            let side = DEFAULT_WIDTH.min(DEFAULT_HEIGHT);
            (side, side)
        }
        _ => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    };
    Figure::new(args.width.unwrap_or(width), args.height.unwrap_or(height))
}

fn run_apply(args: ApplyArgs, input: &str) -> Result<()> {
    let series: Series = parse(input)?;
    let values: Vec<Value> = args.args.iter().map(|a| argument(a)).collect();

    let output = apply(&args.function, &series, &values)
        .with_context(|| format!("Failed to apply '{}'", args.function))?;

    let json = serde_json::to_string(&output).context("Failed to serialize result")?;
    write_stdout(format!("{}\n", json).as_bytes())
}

/// `2`, `true`, `null` and `"quoted"` are JSON; anything else is text
fn argument(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Text(raw.to_string()))
}

fn parse<T: DeserializeOwned>(input: &str) -> Result<T> {
    serde_json::from_str(input).context("Failed to parse JSON input")
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(bytes)
        .context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
