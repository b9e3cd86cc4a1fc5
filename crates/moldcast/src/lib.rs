//! Single-mold translational casting of simple polygons.
//!
//! A polygon is castable through one of its edges (the *top edge*) if a mold
//! whose cavity has the polygon's shape lets the part be translated straight
//! out through that edge without colliding with the mold walls. Sliding along
//! the mold surface is allowed.
//!
//! Layout
//! - `kernel`: exact orientation and direction-ordering predicates (trait + backends).
//! - `polygon`: cyclic vertex list, edge iteration, orientation, validation.
//! - `casting`: outer circles, single-edge feasibility, lookup by direction, per-edge ranges.
//! - `arrangement`: sweep over the circle of directions enumerating all top edges.
//! - `io`: plain-text polygons, directions and expected-result case files.
//! - `rand`: reproducible random simple polygons for tests and benchmarks.
//!
//! API Policy
//! - `api` and `prelude` are the curated import surfaces; module paths may move.

pub mod api;
pub mod arrangement;
pub mod casting;
pub mod io;
pub mod kernel;
pub mod polygon;
pub mod rand;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::arrangement::{extend_top_edges, top_edges};
    pub use crate::casting::{
        find_top_edge, is_pullout_direction, outer_circle, pullout_directions, DirectionRange,
        OuterCircle, TopEdge,
    };
    pub use crate::kernel::{CastingKernel, Direction, IntegerKernel, Orientation, RobustKernel};
    pub use crate::polygon::{Edge, Polygon, PolygonError};
    pub use nalgebra::Vector2 as Vec2;
}
