//! Curated import surface (UNSTABLE).
//!
//! Important
//! - Prefer these re-exports in the CLI, benches and examples; module paths
//!   inside the crate may move without notice.

// Kernels and predicates
pub use crate::kernel::{
    CastingKernel, Direction, IntegerKernel, Orientation, RobustKernel, COORD_LIMIT,
};
// Polygons
pub use crate::polygon::{Edge, Polygon, PolygonError};
// Analyzer
pub use crate::arrangement::{extend_top_edges, top_edges};
pub use crate::casting::{
    find_top_edge, is_pullout_direction, outer_circle, pullout_directions, DirectionRange,
    OuterCircle, TopEdge,
};
// Text I/O
pub use crate::io::{
    compare_with_expected, format_case, parse_case, parse_direction, parse_polygon, CastingCase,
    Mismatch, ParseError,
};
// Random polygons
pub use crate::rand::{
    draw_pocket_polygon, draw_star_polygon, PocketCfg, ReplayToken as PolygonReplay, StarCfg,
    VertexCount,
};
