use std::fs::File;
use std::io::{self, BufRead, BufReader};

use boardgeom::layout::{Orientation, group_by_columns, group_by_rows, infer_orientation};
use boardgeom::{
    AlignOptions, Bounds, Columns, Direction, DragSession, GeometryConfig, GeometryError, GridOptions, Rect,
    SpatialIndex, grid_arrange, smart_align,
};
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration [{code}]: {err}", code = .0.error_code(), err = .0)]
    Config(#[from] GeometryError),
    #[error("failed to read board from {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("line {line}: {source}")]
    BadLine { line: usize, source: serde_json::Error },
    #[error("item `{0}` is not on the board")]
    UnknownItem(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "boardgeom", about = "Spatial queries, snapping and layout over a board export")]
struct Cli {
    #[arg(long, default_value = "-", help = "Board JSONL file, or - for stdin")]
    input: String,

    #[arg(long, env = "BOARDGEOM_GRID_SIZE")]
    grid_size: Option<f64>,

    #[arg(long, env = "BOARDGEOM_SNAP_THRESHOLD")]
    threshold: Option<f64>,

    #[arg(long, env = "BOARDGEOM_NEIGHBOR_RADIUS")]
    radius: Option<f64>,

    #[arg(long, env = "BOARDGEOM_LAYOUT_SPACING")]
    spacing: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Items near the given item (same or edge-adjacent bucket, within the radius).
    Nearby { id: String },
    /// Items overlapping a box.
    InBox(BoxArgs),
    /// Snap an item dragged to a tentative position.
    Snap(SnapArgs),
    /// Align every item on the board toward one edge.
    Align(AlignArgs),
    /// Arrange every item on the board into a grid.
    Grid(GridArgs),
    /// Show the inferred orientation and row/column clusters.
    Groups,
}

#[derive(Args, Debug)]
struct BoxArgs {
    #[arg(long)]
    x: f64,
    #[arg(long)]
    y: f64,
    #[arg(long)]
    width: f64,
    #[arg(long)]
    height: f64,
}

#[derive(Args, Debug)]
struct SnapArgs {
    id: String,
    #[arg(long)]
    x: f64,
    #[arg(long)]
    y: f64,
}

#[derive(Args, Debug)]
struct AlignArgs {
    #[arg(long, help = "left, right, top or bottom")]
    direction: String,
    #[arg(long, default_value_t = false)]
    sort: bool,
}

#[derive(Args, Debug)]
struct GridArgs {
    #[arg(long, default_value = "auto")]
    columns: Columns,
    #[arg(long, default_value_t = false)]
    sort: bool,
    #[arg(long)]
    start_x: Option<f64>,
    #[arg(long)]
    start_y: Option<f64>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(GeometryConfig::from_env()?, &cli)?;
    let items = read_board(&cli.input)?;
    tracing::info!(count = items.len(), grid_size = config.grid_size, "board loaded");

    let output = run(cli.command, items, &config)?;
    print_json(&output)
}

/// Apply flag overrides on top of the environment config.
fn resolve_config(mut config: GeometryConfig, cli: &Cli) -> Result<GeometryConfig, CliError> {
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(threshold) = cli.threshold {
        config.snap_threshold = threshold;
    }
    if let Some(radius) = cli.radius {
        config.neighbor_radius = radius;
    }
    if let Some(spacing) = cli.spacing {
        config.layout_spacing = spacing;
    }
    config.validate()?;
    Ok(config)
}

fn run(command: Command, items: Vec<Rect>, config: &GeometryConfig) -> Result<Value, CliError> {
    match command {
        Command::Nearby { id } => {
            let index = load_index(items, config)?;
            let item = index.get(&id).ok_or_else(|| CliError::UnknownItem(id.clone()))?;
            Ok(serde_json::to_value(index.find_nearby_items(item, config.neighbor_radius))?)
        }
        Command::InBox(args) => {
            let index = load_index(items, config)?;
            let area = Bounds::new(args.x, args.y, args.width, args.height);
            Ok(serde_json::to_value(index.find_items_in_box(&area))?)
        }
        Command::Snap(args) => {
            let mut session = DragSession::new(load_index(items, config)?, config);
            if !session.begin(&args.id) {
                return Err(CliError::UnknownItem(args.id));
            }
            let snap = session.pointer_move(args.x, args.y);
            let committed = session.end();
            Ok(json!({ "snap": snap, "item": committed }))
        }
        Command::Align(args) => {
            let direction = Direction::from(args.direction.as_str());
            if direction == Direction::Other {
                tracing::warn!(direction = %args.direction, "unknown direction; items left in place");
            }
            let opts = AlignOptions { direction, sort: args.sort, spacing: config.layout_spacing };
            Ok(serde_json::to_value(smart_align(&items, &opts))?)
        }
        Command::Grid(args) => {
            let opts = GridOptions {
                columns: args.columns,
                sort: args.sort,
                spacing: config.layout_spacing,
                start_x: args.start_x,
                start_y: args.start_y,
            };
            Ok(serde_json::to_value(grid_arrange(&items, &opts))?)
        }
        Command::Groups => Ok(groups(&items)),
    }
}

fn load_index(items: Vec<Rect>, config: &GeometryConfig) -> Result<SpatialIndex, CliError> {
    let mut index = SpatialIndex::from_config(config)?;
    index.bulk_load(items);
    Ok(index)
}

fn groups(items: &[Rect]) -> Value {
    let orientation = match infer_orientation(items) {
        Orientation::Row => "row",
        Orientation::Column => "column",
    };
    json!({
        "orientation": orientation,
        "rows": cluster_ids(items, group_by_rows(items)),
        "columns": cluster_ids(items, group_by_columns(items)),
    })
}

fn cluster_ids(items: &[Rect], clusters: Vec<Vec<usize>>) -> Vec<Vec<&str>> {
    clusters
        .into_iter()
        .map(|cluster| cluster.into_iter().filter_map(|i| items.get(i)).map(|r| r.id.as_str()).collect())
        .collect()
}

fn read_board(input: &str) -> Result<Vec<Rect>, CliError> {
    let read_err = |source: io::Error| CliError::Read { path: input.to_owned(), source };
    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(input).map_err(read_err)?))
    };

    let mut items = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(read_err)?;
        match parse_board_line(&line) {
            Ok(Some(rect)) => items.push(rect),
            Ok(None) => tracing::debug!(line = n + 1, "skipped non-object line"),
            Err(source) => return Err(CliError::BadLine { line: n + 1, source }),
        }
    }
    Ok(items)
}

/// One JSONL line of a board export. Blank lines and records whose `type`
/// is anything but `object` (the export header, for instance) yield `None`.
fn parse_board_line(line: &str) -> Result<Option<Rect>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = serde_json::from_str::<Value>(trimmed)?;
    if value.get("type").and_then(Value::as_str).is_some_and(|t| t != "object") {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
