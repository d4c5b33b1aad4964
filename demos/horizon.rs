use std::{
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

use horizonsweeper::{
    compute_horizon, generators,
    projection::{grid_triangles, terrain_chains},
    Horizon, MonotoneChain, Point, ProjectionParams,
};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Example {
    Terrain,
    Sawtooth,
    Zigzags,
}

/// Computes the horizon seen from a viewpoint over a terrain.
#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    input: Input,

    /// The viewpoint, as `x,y,z`. Defaults to just above the middle of the terrain.
    #[arg(long, value_delimiter = ',', num_args = 3)]
    view: Option<Vec<f64>>,

    /// How far above the terrain the default viewpoint is.
    #[arg(long, default_value_t = 1.8)]
    eye_height: f64,

    /// Write the horizon as an SVG image.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the horizon as a WKT line string, wrapped in XML.
    #[arg(long)]
    xml: Option<PathBuf>,

    /// Side length of the synthetic terrain grid.
    #[arg(long, default_value_t = 100)]
    size: usize,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A terrain file with one `x;y;z` point per line, on a regular grid in row-major order.
    input: Option<PathBuf>,

    #[arg(long)]
    example: Option<Example>,
}

fn read_terrain(path: &Path) -> anyhow::Result<Vec<Point>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut ret = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let coords = line
            .split(';')
            .map(|s| s.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("line {}", line_no + 1))?;
        let [x, y, z] = coords[..] else {
            bail!("line {}: expected 3 coordinates, got {}", line_no + 1, coords.len());
        };
        ret.push(Point::with_z(x, y, z));
    }
    Ok(ret)
}

// The number of points in the first row of a row-major grid.
fn grid_columns(points: &[Point]) -> usize {
    match points.first() {
        Some(first) => points.iter().take_while(|p| p.y == first.y).count(),
        None => 0,
    }
}

fn default_view(points: &[Point], eye_height: f64) -> Option<Point> {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;
    let nearest = points.iter().min_by(|a, b| {
        let da = (a.x - cx).hypot(a.y - cy);
        let db = (b.x - cx).hypot(b.y - cy);
        da.total_cmp(&db)
    })?;
    // Stay off the grid vertices, which would be directly below us.
    Some(Point::with_z(cx + 0.25, cy + 0.25, nearest.z + eye_height))
}

fn get_chains(args: &Cli) -> anyhow::Result<Vec<MonotoneChain>> {
    let params = ProjectionParams::default();
    let view_arg = args
        .view
        .as_ref()
        .map(|v| Point::with_z(v[0], v[1], v[2]));

    let points = match (&args.input.input, &args.input.example) {
        (Some(path), None) => read_terrain(path)?,
        (None, Some(Example::Terrain)) => {
            let triangles = generators::terrain_grid(args.size, 10.0);
            let view = view_arg.unwrap_or(Point::with_z(
                0.25,
                0.25,
                generators::terrain_height(0.0, 0.0) + args.eye_height,
            ));
            return Ok(terrain_chains(view, triangles, &params));
        }
        (None, Some(Example::Sawtooth)) => return Ok(generators::sawtooth(args.size)),
        (None, Some(Example::Zigzags)) => return Ok(generators::zigzags(4, args.size)),
        _ => unreachable!(),
    };

    let columns = grid_columns(&points);
    if columns < 2 || points.len() % columns != 0 {
        bail!(
            "expected a regular grid, but the first row has {columns} of {} points",
            points.len()
        );
    }
    let view = match view_arg {
        Some(v) => v,
        None => default_view(&points, args.eye_height).context("empty terrain")?,
    };
    tracing::info!(points = points.len(), columns, ?view, "read terrain");
    Ok(terrain_chains(view, grid_triangles(columns, &points), &params))
}

fn wkt_line_string(points: &[Point]) -> String {
    if points.is_empty() {
        return "LINESTRING EMPTY".to_owned();
    }
    let coords: Vec<String> = points.iter().map(|p| format!("{} {}", p.x, p.y)).collect();
    format!("LINESTRING ({})", coords.join(", "))
}

fn write_xml(path: &Path, horizon: &Horizon) -> anyhow::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut out = std::fs::File::create(path)?;
    writeln!(out, "<run><case><desc>{name}</desc>")?;
    writeln!(out, "<a>{}</a>", wkt_line_string(&horizon.to_line_string()))?;
    writeln!(out, "</case></run>")?;
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let chains = get_chains(&args)?;
    let horizon = compute_horizon(chains)?;
    println!(
        "horizon has {} chains and {} points",
        horizon.len(),
        horizon.vertex_count()
    );

    if let Some(path) = &args.svg {
        svg::save(path, &horizon.dump_svg())?;
    }
    if let Some(path) = &args.xml {
        write_xml(path, &horizon)?;
    }
    Ok(())
}
