//! Subcommand bodies, generic over the casting kernel.
//!
//! Every command reads plain-text polygons (see `moldcast::io`), runs the
//! analyzer with the kernel picked on the command line and renders the result.
//! Rendering is split from printing so tests can inspect the output.

use anyhow::{bail, Context, Result};
use moldcast::api::{
    compare_with_expected, find_top_edge, parse_case, parse_direction, parse_polygon, top_edges,
    CastingCase, CastingKernel, Direction, IntegerKernel, Polygon, PolygonError, RobustKernel,
    TopEdge,
};
use nalgebra::{Scalar, Vector2};
use polars::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::provenance::{write_sidecar, Payload};

/// Coordinate types accepted on the command line.
pub trait Coord: Scalar + Copy + FromStr + Display {
    fn to_f64(self) -> f64;
    fn is_zero(self) -> bool;
    fn is_finite(self) -> bool;
}

impl Coord for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn is_zero(self) -> bool {
        self == 0
    }
    fn is_finite(self) -> bool {
        true
    }
}

impl Coord for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn is_zero(self) -> bool {
        self == 0.0
    }
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// A kernel over `Vector2<T>` points, constructible from the command line.
pub trait Backend<T: Scalar>:
    CastingKernel<Point = Vector2<T>, Direction = Direction<T>> + Default
{
    const NAME: &'static str;
}

impl Backend<i64> for IntegerKernel {
    const NAME: &'static str = "integer";
}

impl Backend<f64> for RobustKernel {
    const NAME: &'static str = "robust";
}

/// Options shared by all subcommands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Opts {
    /// Run the O(n²) validation layer before analysis.
    pub validate: bool,
}

#[derive(Debug, Serialize)]
pub struct TopEdgeRecord {
    pub edge: usize,
    pub first: [f64; 2],
    pub last: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct Analysis {
    pub file: String,
    pub kernel: &'static str,
    pub vertices: usize,
    pub orientation: String,
    pub castable: bool,
    pub top_edges: Vec<TopEdgeRecord>,
}

fn record<T: Coord>(t: &TopEdge<Direction<T>>) -> TopEdgeRecord {
    TopEdgeRecord {
        edge: t.edge,
        first: [t.range.first.dx().to_f64(), t.range.first.dy().to_f64()],
        last: [t.range.last.dx().to_f64(), t.range.last.dy().to_f64()],
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn ensure_finite_direction<T: Coord>(d: &Direction<T>) -> Result<()> {
    if !(d.dx().is_finite() && d.dy().is_finite()) {
        bail!("direction ({}, {}) is not finite", d.dx(), d.dy());
    }
    if d.dx().is_zero() && d.dy().is_zero() {
        bail!("the zero vector is not a direction");
    }
    Ok(())
}

/// Vertices outside the kernel domain (too large, or not finite) are always
/// rejected; the full O(n²) check runs with `--validate`.
fn ensure_valid<T: Coord, K: Backend<T>>(
    pgn: &Polygon<Vector2<T>>,
    path: &Path,
    opts: Opts,
) -> Result<()> {
    let kernel = K::default();
    if let Some(index) = pgn.vertices().iter().position(|v| !kernel.in_domain(v)) {
        return Err(PolygonError::CoordinateOutOfRange { index })
            .with_context(|| format!("invalid polygon in {}", path.display()));
    }
    if opts.validate {
        pgn.validate(&kernel)
            .with_context(|| format!("invalid polygon in {}", path.display()))?;
    }
    Ok(())
}

pub fn load_polygon<T: Coord, K: Backend<T>>(
    path: &Path,
    opts: Opts,
) -> Result<Polygon<Vector2<T>>> {
    let pgn = parse_polygon::<T>(&read(path)?)
        .with_context(|| format!("parsing polygon {}", path.display()))?;
    ensure_valid::<T, K>(&pgn, path, opts)?;
    Ok(pgn)
}

pub fn analyze_polygon<T: Coord, K: Backend<T>>(
    pgn: &Polygon<Vector2<T>>,
    file: &Path,
) -> (Analysis, Vec<TopEdge<Direction<T>>>) {
    let kernel = K::default();
    let tops = top_edges(pgn, &kernel);
    let orientation = pgn.orientation(&kernel).to_string();
    tracing::info!(
        file = %file.display(),
        vertices = pgn.len(),
        orientation = %orientation,
        top_edges = tops.len(),
        "analyzed"
    );
    let analysis = Analysis {
        file: file.display().to_string(),
        kernel: K::NAME,
        vertices: pgn.len(),
        orientation,
        castable: !tops.is_empty(),
        top_edges: tops.iter().map(record).collect(),
    };
    (analysis, tops)
}

/// Human-readable listing of all top edges.
pub fn render_text<T: Coord>(pgn: &Polygon<Vector2<T>>, tops: &[TopEdge<Direction<T>>]) -> String {
    if tops.is_empty() {
        return "The polygon is not castable!\n".to_string();
    }
    let mut out = format!("There are {} top edges:\n", tops.len());
    for t in tops {
        if let Some(e) = pgn.edge(t.edge) {
            out.push_str(&format!(
                "\tEdge {}: ({}, {}) -> ({}, {})\n",
                t.edge, e.source.x, e.source.y, e.target.x, e.target.y
            ));
        }
        out.push_str(&format!(
            "\tPullout directions from: ({}, {}) to ({}, {})\n\n",
            t.range.first.dx(),
            t.range.first.dy(),
            t.range.last.dx(),
            t.range.last.dy()
        ));
    }
    out
}

pub fn analyze<T: Coord, K: Backend<T>>(input: &Path, as_json: bool, opts: Opts) -> Result<()> {
    let pgn = load_polygon::<T, K>(input, opts)?;
    let (analysis, tops) = analyze_polygon::<T, K>(&pgn, input);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_text(&pgn, &tops));
    }
    Ok(())
}

/// The unique top edge for `(dx, dy)`, if any.
pub fn lookup_edge<T: Coord, K: Backend<T>>(
    pgn: &Polygon<Vector2<T>>,
    dx: &str,
    dy: &str,
) -> Result<Option<usize>> {
    let d: Direction<T> = parse_direction(&format!("{dx} {dy}"))
        .with_context(|| format!("parsing direction ({dx}, {dy})"))?;
    ensure_finite_direction(&d)?;
    Ok(find_top_edge(pgn, &d, &K::default()))
}

pub fn lookup<T: Coord, K: Backend<T>>(input: &Path, dx: &str, dy: &str, opts: Opts) -> Result<()> {
    let pgn = load_polygon::<T, K>(input, opts)?;
    let found = lookup_edge::<T, K>(&pgn, dx, dy)?;
    tracing::info!(file = %input.display(), dx, dy, top_edge = ?found, "lookup");
    match found {
        Some(edge) => println!("top edge: {edge}"),
        None => println!("none"),
    }
    Ok(())
}

/// Run one case file; `Ok(Err(msg))` is a failed comparison.
pub fn check_case<T: Coord, K: Backend<T>>(
    path: &Path,
    opts: Opts,
) -> Result<std::result::Result<(), String>> {
    let case: CastingCase<T> =
        parse_case(&read(path)?).with_context(|| format!("parsing case {}", path.display()))?;
    ensure_valid::<T, K>(&case.polygon, path, opts)?;
    for t in &case.expected {
        ensure_finite_direction(&t.range.first)
            .and_then(|()| ensure_finite_direction(&t.range.last))
            .with_context(|| format!("expected edge {} in {}", t.edge, path.display()))?;
    }
    let kernel = K::default();
    let got = top_edges(&case.polygon, &kernel);
    Ok(compare_with_expected(&got, &case.expected, &kernel).map_err(|m| m.to_string()))
}

pub fn check<T: Coord, K: Backend<T>>(files: &[PathBuf], opts: Opts) -> Result<()> {
    let mut failed = 0usize;
    for path in files {
        match check_case::<T, K>(path, opts)? {
            Ok(()) => println!("{}: ok", path.display()),
            Err(msg) => {
                tracing::warn!(file = %path.display(), mismatch = %msg, "case failed");
                println!("{}: {msg}", path.display());
                failed += 1;
            }
        }
    }
    tracing::info!(files = files.len(), failed, "check");
    if failed > 0 {
        bail!("{failed} of {} case files failed", files.len());
    }
    Ok(())
}

/// One row per top edge; polygons without top edges get a single row with
/// null edge and range columns. Invalid inputs are skipped with a warning.
pub fn batch_frame<T: Coord, K: Backend<T>>(inputs: &[PathBuf], opts: Opts) -> Result<DataFrame> {
    let mut file = Vec::new();
    let mut vertices = Vec::new();
    let mut orientation = Vec::new();
    let mut edge: Vec<Option<u64>> = Vec::new();
    let mut cols: [Vec<Option<f64>>; 4] = Default::default();
    for path in inputs {
        let pgn = match load_polygon::<T, K>(path, opts) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %format!("{err:#}"), "skipped");
                continue;
            }
        };
        let (analysis, _) = analyze_polygon::<T, K>(&pgn, path);
        let mut push = |e: Option<&TopEdgeRecord>| {
            file.push(analysis.file.clone());
            vertices.push(analysis.vertices as u64);
            orientation.push(analysis.orientation.clone());
            edge.push(e.map(|t| t.edge as u64));
            let vals = e.map(|t| [t.first[0], t.first[1], t.last[0], t.last[1]]);
            for (k, col) in cols.iter_mut().enumerate() {
                col.push(vals.map(|v| v[k]));
            }
        };
        if analysis.top_edges.is_empty() {
            push(None);
        }
        for t in &analysis.top_edges {
            push(Some(t));
        }
    }
    let [first_dx, first_dy, last_dx, last_dy] = cols;
    let df = df!(
        "file" => file,
        "vertices" => vertices,
        "orientation" => orientation,
        "edge" => edge,
        "first_dx" => first_dx,
        "first_dy" => first_dy,
        "last_dx" => last_dx,
        "last_dy" => last_dy
    )?;
    Ok(df)
}

pub fn batch<T: Coord, K: Backend<T>>(inputs: &[PathBuf], out: &Path, opts: Opts) -> Result<PathBuf> {
    let mut df = batch_frame::<T, K>(inputs, opts)?;
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let mut sink = fs::File::create(out).with_context(|| format!("creating {}", out.display()))?;
    CsvWriter::new(&mut sink)
        .finish(&mut df)
        .with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(out = %out.display(), rows = df.height(), inputs = inputs.len(), "batch");
    let inputs: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
    let prov = write_sidecar(
        out,
        Payload::new(json!({
            "command": "batch",
            "kernel": K::NAME,
            "validate": opts.validate,
            "inputs": inputs,
            "rows": df.height(),
        })),
    )?;
    Ok(prov)
}

/// File and top-edge counts of a CSV written by `batch`.
pub fn summarize_batch(csv: &Path) -> Result<serde_json::Value> {
    let lf = LazyCsvReader::new(csv)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("reading {}", csv.display()))?;
    let all = lf
        .clone()
        .select([col("file").n_unique().alias("files")])
        .collect()?;
    let castable = lf
        .filter(col("edge").is_not_null())
        .select([
            col("file").n_unique().alias("castable_files"),
            col("edge").count().alias("top_edges"),
        ])
        .collect()?;
    let first = |df: &DataFrame, name: &str| -> Result<u64> {
        Ok(df
            .column(name)?
            .cast(&DataType::UInt64)?
            .u64()?
            .get(0)
            .unwrap_or(0))
    };
    Ok(json!({
        "files": first(&all, "files")?,
        "castable_files": first(&castable, "castable_files")?,
        "top_edges": first(&castable, "top_edges")?,
    }))
}
