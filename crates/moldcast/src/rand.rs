//! Random simple polygons on the integer grid (radial jitter + replay tokens).
//!
//! Purpose
//! - Reproducible inputs for property tests and benchmarks of the casting
//!   analyzer. All samples are validated, so every returned polygon satisfies
//!   the analyzer preconditions exactly.
//!
//! Families
//! - Star: `n` jittered angles around the origin with jittered radii, rounded
//!   to the grid. Mostly non-convex, often not castable.
//! - Pocket: a horizontal top edge over an x-monotone chain hanging below it.
//!   Castable by construction: the top edge is the last edge and straight up
//!   is a pullout direction.
//!
//! Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kernel::IntegerKernel;
use crate::polygon::Polygon;

/// How many vertices a sampler draws; values below three are raised to three.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexCount {
    Exactly(usize),
    Between { min: usize, max: usize },
}

impl VertexCount {
    fn draw(self, rng: &mut StdRng) -> usize {
        let (lo, hi) = match self {
            VertexCount::Exactly(n) => (n, n),
            VertexCount::Between { min, max } => (min, max),
        };
        let lo = lo.max(3);
        rng.gen_range(lo..=hi.max(lo))
    }
}

/// Names one draw: the same `(seed, index)` always yields the same polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    fn rng(self) -> StdRng {
        StdRng::seed_from_u64(splitmix64(self.seed ^ splitmix64(self.index)))
    }
}

/// One SplitMix64 output step; decorrelates neighbouring indices.
#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Star-shaped sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct StarCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Base radius in grid units.
    pub base_radius: f64,
    pub random_phase: bool,
}
impl Default for StarCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Between { min: 3, max: 10 },
            angle_jitter_frac: 0.2,
            radial_jitter: 0.5,
            base_radius: 1000.0,
            random_phase: true,
        }
    }
}

/// Pocket sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct PocketCfg {
    /// Number of chain vertices strictly between the two top corners.
    pub chain_vertices: VertexCount,
    /// Top edge length in grid units.
    pub width: i64,
    /// Maximal depth of the chain below the top edge.
    pub depth: i64,
}
impl Default for PocketCfg {
    fn default() -> Self {
        Self {
            chain_vertices: VertexCount::Between { min: 3, max: 12 },
            width: 1000,
            depth: 400,
        }
    }
}

/// Draw a star-shaped polygon (counterclockwise); `None` if rounding made it degenerate.
pub fn draw_star_polygon(cfg: StarCfg, tok: ReplayToken) -> Option<Polygon<Vector2<i64>>> {
    let mut rng = tok.rng();
    let n = cfg.vertex_count.draw(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1.0);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let mut angles: Vec<f64> = (0..n)
        .map(|k| {
            let base = phase + (k as f64) * delta;
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            base + jitter
        })
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut pts: Vec<Vector2<i64>> = angles
        .into_iter()
        .map(|th| {
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            Vector2::new((th.cos() * r).round() as i64, (th.sin() * r).round() as i64)
        })
        .collect();
    pts.dedup();
    validated(pts)
}

/// Draw a castable pocket polygon (counterclockwise, top edge last).
pub fn draw_pocket_polygon(cfg: PocketCfg, tok: ReplayToken) -> Option<Polygon<Vector2<i64>>> {
    let mut rng = tok.rng();
    let width = cfg.width.max(4);
    let depth = cfg.depth.max(1);
    let k = cfg
        .chain_vertices
        .draw(&mut rng)
        .min((width - 1) as usize);
    let mut xs: Vec<i64> = (0..k).map(|_| rng.gen_range(1..width)).collect();
    xs.sort_unstable();
    xs.dedup();
    let mut pts = Vec::with_capacity(xs.len() + 2);
    pts.push(Vector2::new(0, 0));
    for x in xs {
        pts.push(Vector2::new(x, -rng.gen_range(1..=depth)));
    }
    pts.push(Vector2::new(width, 0));
    validated(pts)
}

fn validated(pts: Vec<Vector2<i64>>) -> Option<Polygon<Vector2<i64>>> {
    let pgn = Polygon::new(pts);
    pgn.validate(&IntegerKernel).ok().map(|()| pgn)
}
