//! Precondition checks for the casting analyzer (O(n²), opt-in).

use std::cmp::Ordering;
use std::fmt;

use crate::kernel::{CastingKernel, Orientation};

/// Why a vertex list is not a valid analyzer input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolygonError {
    TooFewVertices { count: usize },
    /// Vertex `index` lies outside the coordinate range the kernel evaluates exactly.
    CoordinateOutOfRange { index: usize },
    /// Vertex `index` coincides with vertex `index + 1` (mod n).
    RepeatedVertex { index: usize },
    /// Vertices `index - 1`, `index`, `index + 1` (mod n) are collinear.
    CollinearVertices { index: usize },
    /// Two non-adjacent edges touch or cross.
    SelfIntersecting { first: usize, second: usize },
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewVertices { count } => {
                write!(f, "polygon needs at least 3 vertices, got {count}")
            }
            Self::CoordinateOutOfRange { index } => {
                write!(f, "vertex {index} is outside the kernel's coordinate range")
            }
            Self::RepeatedVertex { index } => {
                write!(f, "vertex {index} repeats its successor")
            }
            Self::CollinearVertices { index } => {
                write!(f, "vertex {index} is collinear with its neighbours")
            }
            Self::SelfIntersecting { first, second } => {
                write!(f, "edges {first} and {second} intersect")
            }
        }
    }
}

impl std::error::Error for PolygonError {}

pub(super) fn validate<K: CastingKernel>(vs: &[K::Point], kernel: &K) -> Result<(), PolygonError> {
    let n = vs.len();
    if n < 3 {
        return Err(PolygonError::TooFewVertices { count: n });
    }
    if let Some(index) = vs.iter().position(|p| !kernel.in_domain(p)) {
        return Err(PolygonError::CoordinateOutOfRange { index });
    }
    for i in 0..n {
        if kernel.compare_xy(&vs[i], &vs[(i + 1) % n]) == Ordering::Equal {
            return Err(PolygonError::RepeatedVertex { index: i });
        }
    }
    for i in 0..n {
        let prev = &vs[(i + n - 1) % n];
        let next = &vs[(i + 1) % n];
        if kernel.orientation(prev, &vs[i], next) == Orientation::Collinear {
            return Err(PolygonError::CollinearVertices { index: i });
        }
    }
    // Adjacent edges share exactly their common vertex once collinear
    // neighbours are excluded, so only non-adjacent pairs need testing.
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = (&vs[i], &vs[(i + 1) % n]);
            let (c, d) = (&vs[j], &vs[(j + 1) % n]);
            if segments_intersect(kernel, a, b, c, d) {
                return Err(PolygonError::SelfIntersecting {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}

/// Closed-segment intersection test (touching counts).
fn segments_intersect<K: CastingKernel>(
    kernel: &K,
    a: &K::Point,
    b: &K::Point,
    c: &K::Point,
    d: &K::Point,
) -> bool {
    let o1 = kernel.orientation(a, b, c);
    let o2 = kernel.orientation(a, b, d);
    let o3 = kernel.orientation(c, d, a);
    let o4 = kernel.orientation(c, d, b);
    if o1 != o2 && o3 != o4 {
        return true;
    }
    (o1 == Orientation::Collinear && on_segment(kernel, a, c, b))
        || (o2 == Orientation::Collinear && on_segment(kernel, a, d, b))
        || (o3 == Orientation::Collinear && on_segment(kernel, c, a, d))
        || (o4 == Orientation::Collinear && on_segment(kernel, c, b, d))
}

/// `q` on segment `pr`, given the three points are collinear.
fn on_segment<K: CastingKernel>(kernel: &K, p: &K::Point, q: &K::Point, r: &K::Point) -> bool {
    let (lo, hi) = if kernel.compare_xy(p, r) == Ordering::Greater {
        (r, p)
    } else {
        (p, r)
    };
    kernel.compare_xy(lo, q) != Ordering::Greater && kernel.compare_xy(q, hi) != Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{IntegerKernel, RobustKernel};
    use crate::polygon::Polygon;
    use nalgebra::{vector, Vector2};

    fn poly(pts: &[(i64, i64)]) -> Polygon<Vector2<i64>> {
        pts.iter().map(|&(x, y)| vector![x, y]).collect()
    }

    #[test]
    fn accepts_simple_polygons() {
        let k = IntegerKernel;
        assert_eq!(poly(&[(0, 0), (1, 0), (0, 1)]).validate(&k), Ok(()));
        // Comb with two teeth (non-convex).
        let comb = poly(&[(0, 0), (5, 0), (5, 3), (4, 3), (4, 1), (1, 1), (1, 3), (0, 3)]);
        assert_eq!(comb.validate(&k), Ok(()));
        assert_eq!(comb.reversed().validate(&k), Ok(()));
    }

    #[test]
    fn rejects_bow_tie() {
        let k = IntegerKernel;
        let bow = poly(&[(0, 0), (2, 2), (2, 0), (0, 2)]);
        assert_eq!(
            bow.validate(&k),
            Err(PolygonError::SelfIntersecting {
                first: 0,
                second: 2
            })
        );
    }

    #[test]
    fn rejects_degenerate_inputs() {
        let k = IntegerKernel;
        assert_eq!(
            poly(&[(0, 0), (1, 0)]).validate(&k),
            Err(PolygonError::TooFewVertices { count: 2 })
        );
        assert_eq!(
            poly(&[(0, 0), (1, 0), (1, 0), (0, 1)]).validate(&k),
            Err(PolygonError::RepeatedVertex { index: 1 })
        );
        assert_eq!(
            poly(&[(0, 0), (1, 0), (2, 0), (0, 1)]).validate(&k),
            Err(PolygonError::CollinearVertices { index: 1 })
        );
    }

    #[test]
    fn rejects_coordinates_outside_the_kernel_domain() {
        // Edge 0 spans 3·2^62 and would wrap in i64.
        let far = 3 * (1i64 << 61);
        let wide = poly(&[(-far, 0), (far, 0), (0, 1)]);
        assert_eq!(
            wide.validate(&IntegerKernel),
            Err(PolygonError::CoordinateOutOfRange { index: 0 })
        );
        assert_eq!(
            PolygonError::CoordinateOutOfRange { index: 0 }.to_string(),
            "vertex 0 is outside the kernel's coordinate range"
        );
        let inf = Polygon::new(vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![0.0, f64::INFINITY],
        ]);
        assert_eq!(
            inf.validate(&RobustKernel),
            Err(PolygonError::CoordinateOutOfRange { index: 2 })
        );
        let nan = Polygon::new(vec![vector![f64::NAN, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]]);
        assert_eq!(
            nan.validate(&RobustKernel),
            Err(PolygonError::CoordinateOutOfRange { index: 0 })
        );
    }

    #[test]
    fn rejects_touching_vertex() {
        // Vertex (2, 0) of the notch touches the bottom edge.
        let k = RobustKernel;
        let p = Polygon::new(vec![
            vector![0.0, 0.0],
            vector![4.0, 0.0],
            vector![4.0, 4.0],
            vector![3.0, 4.0],
            vector![2.0, 0.0],
            vector![1.0, 4.0],
            vector![0.0, 4.0],
        ]);
        assert!(matches!(
            p.validate(&k),
            Err(PolygonError::SelfIntersecting { .. })
        ));
        let msg = PolygonError::SelfIntersecting { first: 0, second: 3 }.to_string();
        assert_eq!(msg, "edges 0 and 3 intersect");
    }
}
