//! Simple polygons as cyclic vertex lists.
//!
//! - Edge `i` runs from vertex `i` to vertex `(i + 1) % n`; there is no cyclic
//!   pointer structure, only indexed access with wraparound.
//! - Orientation is derived on demand through a kernel, never stored.
//! - Simplicity and non-collinearity are caller preconditions; `validate`
//!   checks them on request and the analyzer runs it in debug builds only.

use std::fmt;

use nalgebra::{Scalar, Vector2};

use crate::kernel::{CastingKernel, Orientation};

mod validate;

pub use validate::PolygonError;

/// Ordered, implicitly closed vertex sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon<P> {
    vertices: Vec<P>,
}

/// One polygon edge, `source → target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<P> {
    pub index: usize,
    pub source: P,
    pub target: P,
}

impl<P: Copy> Polygon<P> {
    #[inline]
    pub fn new(vertices: Vec<P>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[P] {
        &self.vertices
    }

    /// Number of vertices, which equals the number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edge `i`, or `None` if `i` is out of range.
    pub fn edge(&self, i: usize) -> Option<Edge<P>> {
        let n = self.vertices.len();
        if i >= n {
            return None;
        }
        Some(Edge {
            index: i,
            source: self.vertices[i],
            target: self.vertices[(i + 1) % n],
        })
    }

    /// Restartable iterator over all edges, closing edge last.
    #[inline]
    pub fn edges(&self) -> Edges<'_, P> {
        Edges {
            vertices: &self.vertices,
            next: 0,
        }
    }

    /// Same boundary traversed the other way. Edge `k` of the result is edge
    /// `(2n - 2 - k) % n` of `self`, reversed.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }

    pub fn map_points<Q, F: FnMut(&P) -> Q>(&self, f: F) -> Polygon<Q> {
        Polygon {
            vertices: self.vertices.iter().map(f).collect(),
        }
    }

    /// Orientation of the boundary, read off at the lexicographically smallest
    /// vertex (always a convex corner of a simple polygon).
    ///
    /// Returns `Collinear` for fewer than three vertices or degenerate input.
    pub fn orientation<K>(&self, kernel: &K) -> Orientation
    where
        K: CastingKernel<Point = P>,
    {
        let n = self.vertices.len();
        if n < 3 {
            return Orientation::Collinear;
        }
        let mut lowest = 0usize;
        for i in 1..n {
            if kernel.compare_xy(&self.vertices[i], &self.vertices[lowest]).is_lt() {
                lowest = i;
            }
        }
        let prev = self.vertices[(lowest + n - 1) % n];
        let next = self.vertices[(lowest + 1) % n];
        kernel.orientation(&prev, &self.vertices[lowest], &next)
    }

    /// Check the analyzer preconditions: at least three vertices, every vertex
    /// inside the kernel's domain, no repeated consecutive vertices, no three
    /// consecutive collinear vertices, simple.
    pub fn validate<K>(&self, kernel: &K) -> Result<(), PolygonError>
    where
        K: CastingKernel<Point = P>,
    {
        validate::validate(&self.vertices, kernel)
    }
}

/// Run the precondition pass in debug builds; compiled out in release.
#[inline]
pub(crate) fn debug_validate<K: CastingKernel>(pgn: &Polygon<K::Point>, kernel: &K) {
    if cfg!(debug_assertions) {
        if let Err(err) = pgn.validate(kernel) {
            panic!("casting precondition violated: {err}");
        }
    }
}

impl<P> FromIterator<P> for Polygon<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            vertices: iter.into_iter().collect(),
        }
    }
}

/// Plain-text form `n x0 y0 x1 y1 …`, readable by `io::parse_polygon`.
impl<T: Scalar + fmt::Display> fmt::Display for Polygon<Vector2<T>> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertices.len())?;
        for v in &self.vertices {
            write!(f, " {} {}", v.x, v.y)?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Polygon::edges`].
#[derive(Clone, Debug)]
pub struct Edges<'a, P> {
    vertices: &'a [P],
    next: usize,
}

impl<P: Copy> Iterator for Edges<'_, P> {
    type Item = Edge<P>;

    fn next(&mut self) -> Option<Edge<P>> {
        let n = self.vertices.len();
        if self.next >= n {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(Edge {
            index: i,
            source: self.vertices[i],
            target: self.vertices[(i + 1) % n],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.vertices.len().saturating_sub(self.next);
        (rest, Some(rest))
    }
}

impl<P: Copy> ExactSizeIterator for Edges<'_, P> {}
