//! Enumerate the top edges of one polygon and print them.
//!
//! Usage:
//!   cargo run -p moldcast --example single_mold -- [polygon-file]
//!
//! Without an argument a small pocket polygon is analyzed. The file format is
//! `n x0 y0 … x{n-1} y{n-1}`.

use std::process::ExitCode;

use moldcast::api::{parse_polygon, top_edges, Polygon, RobustKernel};
use nalgebra::{vector, Vector2};

fn load(path: &str) -> Result<Polygon<Vector2<f64>>, String> {
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to open {path}: {e}"))?;
    parse_polygon(&text).map_err(|e| format!("Failed to read a polygon from {path}: {e}"))
}

fn pocket() -> Polygon<Vector2<f64>> {
    Polygon::new(vec![
        vector![0.0, 0.0],
        vector![1.0, -3.0],
        vector![3.0, -3.0],
        vector![4.0, -1.0],
        vector![5.0, -2.0],
        vector![6.0, 0.0],
    ])
}

fn main() -> ExitCode {
    let pgn = match std::env::args().nth(1) {
        Some(path) => match load(&path) {
            Ok(p) => p,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        },
        None => pocket(),
    };
    let kernel = RobustKernel;
    let tops = top_edges(&pgn, &kernel);
    if tops.is_empty() {
        println!("The polygon is not castable!");
        return ExitCode::SUCCESS;
    }
    println!("There are {} top edges:", tops.len());
    for t in &tops {
        if let Some(e) = pgn.edge(t.edge) {
            println!(
                "\tEdge: ({}, {}) -> ({}, {})",
                e.source.x, e.source.y, e.target.x, e.target.y
            );
        }
        println!(
            "\tPullout directions from: ({}, {}) to ({}, {})",
            t.range.first.dx(),
            t.range.first.dy(),
            t.range.last.dx(),
            t.range.last.dy()
        );
        println!();
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported_not_panicked() {
        let err = load("/nonexistent/polygon.txt").unwrap_err();
        assert!(err.starts_with("Failed to open /nonexistent/polygon.txt"), "{err}");
    }

    #[test]
    fn default_pocket_has_one_top_edge() {
        let tops = top_edges(&pocket(), &RobustKernel);
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].edge, 5);
    }
}
