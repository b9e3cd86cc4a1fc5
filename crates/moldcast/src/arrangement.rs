//! Enumeration of all top edges by a sweep over the circle of directions.
//!
//! Model
//! - Each edge `j` owns an open collision arc from `second_j` to `first_j`
//!   (see `casting::outer_circle`). A direction is a pullout direction through
//!   edge `i` iff it lies in the collision arc of `i` and of no other edge.
//! - The 2n arc endpoints, sorted by angle and grouped when equal, split the
//!   circle into cells: endpoint directions and the open gaps between them.
//!   Sweeping counterclockwise, the covering arcs of each cell follow from the
//!   previous cell: at an endpoint the arcs ending there leave, in the gap after
//!   it the arcs starting there join.
//! - Coverage is tracked as (count, sum of edge indices); a cell with count 1
//!   names its edge by the sum. Maximal runs of count-1 cells start and end on
//!   endpoint cells, so every emitted range is closed.
//!
//! Complexity
//! - O(n log n) for the sort, O(n) for the sweep.

use crate::casting::{outer_circles, DirectionRange, TopEdge};
use crate::kernel::CastingKernel;
use crate::polygon::{debug_validate, Polygon};

/// All top edges of `pgn` with their closed pullout ranges, by ascending edge index.
///
/// An empty result means the polygon is not castable.
pub fn top_edges<K: CastingKernel>(
    pgn: &Polygon<K::Point>,
    kernel: &K,
) -> Vec<TopEdge<K::Direction>> {
    let mut out = Vec::new();
    extend_top_edges(pgn, kernel, &mut out);
    out
}

/// Append all top edges of `pgn` to `out` (ascending edge index).
pub fn extend_top_edges<K, E>(pgn: &Polygon<K::Point>, kernel: &K, out: &mut E)
where
    K: CastingKernel,
    E: Extend<TopEdge<K::Direction>>,
{
    debug_validate(pgn, kernel);
    let circles = outer_circles(pgn, kernel);
    if circles.is_empty() {
        return;
    }

    let mut endpoints: Vec<Endpoint<K::Direction>> = Vec::with_capacity(2 * circles.len());
    for (edge, c) in circles.iter().enumerate() {
        endpoints.push(Endpoint {
            direction: c.second,
            edge,
            opens: true,
        });
        endpoints.push(Endpoint {
            direction: c.first,
            edge,
            opens: false,
        });
    }
    endpoints.sort_by(|a, b| kernel.compare_angle(&a.direction, &b.direction));

    let mut events: Vec<Event<K::Direction>> = Vec::new();
    for ep in endpoints {
        match events.last_mut() {
            Some(ev) if kernel.equal_directions(&ev.direction, &ep.direction) => ev.add(&ep),
            _ => {
                let mut ev = Event::new(ep.direction);
                ev.add(&ep);
                events.push(ev);
            }
        }
    }

    // Arcs strictly covering the first event direction.
    let mut cover = Cover::default();
    for (edge, c) in circles.iter().enumerate() {
        if !c.contains(kernel, &events[0].direction) {
            cover.insert(edge);
        }
    }

    // Cells alternate: event direction k, then the gap after it.
    let mut cells: Vec<Cell> = Vec::with_capacity(2 * events.len());
    for (k, ev) in events.iter().enumerate() {
        if k > 0 {
            cover.subtract(&ev.closed);
        }
        cells.push(Cell { event: k, cover });
        cover.merge(&ev.opened);
        cells.push(Cell { event: k, cover });
    }

    // Start right after a cell that is not covered exactly once, so no run wraps.
    let Some(anchor) = cells.iter().position(|c| c.cover.single().is_none()) else {
        return;
    };
    let len = cells.len();
    let mut found: Vec<TopEdge<K::Direction>> = Vec::new();
    let mut run: Option<(usize, usize, usize)> = None; // (edge, first cell, last cell)
    for step in 1..=len {
        let idx = (anchor + step) % len;
        match (cells[idx].cover.single(), run) {
            (Some(edge), Some((run_edge, first, _))) if run_edge == edge => {
                run = Some((edge, first, idx));
            }
            (Some(edge), prev) => {
                if let Some(done) = prev {
                    found.push(top_edge(&events, &cells, done));
                }
                debug_assert!(idx % 2 == 0, "a pullout range starts on an arc endpoint");
                run = Some((edge, idx, idx));
            }
            (None, prev) => {
                if let Some(done) = prev {
                    debug_assert!(done.2 % 2 == 0, "a pullout range ends on an arc endpoint");
                    found.push(top_edge(&events, &cells, done));
                }
                run = None;
            }
        }
    }
    found.sort_by_key(|t| t.edge);
    out.extend(found);
}

fn top_edge<D: Copy>(
    events: &[Event<D>],
    cells: &[Cell],
    (edge, first, last): (usize, usize, usize),
) -> TopEdge<D> {
    TopEdge {
        edge,
        range: DirectionRange {
            first: events[cells[first].event].direction,
            last: events[cells[last].event].direction,
        },
    }
}

#[derive(Clone, Copy, Debug)]
struct Endpoint<D> {
    direction: D,
    edge: usize,
    opens: bool,
}

/// All arc endpoints sharing one direction.
#[derive(Clone, Debug)]
struct Event<D> {
    direction: D,
    opened: Cover,
    closed: Cover,
}

impl<D> Event<D> {
    fn new(direction: D) -> Self {
        Self {
            direction,
            opened: Cover::default(),
            closed: Cover::default(),
        }
    }

    fn add(&mut self, ep: &Endpoint<D>) {
        if ep.opens {
            self.opened.insert(ep.edge);
        } else {
            self.closed.insert(ep.edge);
        }
    }
}

/// Multiset summary of covering arcs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cover {
    count: usize,
    sum: usize,
}

impl Cover {
    #[inline]
    fn insert(&mut self, edge: usize) {
        self.count += 1;
        self.sum = self.sum.wrapping_add(edge);
    }

    #[inline]
    fn merge(&mut self, other: &Cover) {
        self.count += other.count;
        self.sum = self.sum.wrapping_add(other.sum);
    }

    #[inline]
    fn subtract(&mut self, other: &Cover) {
        debug_assert!(self.count >= other.count, "closing an arc that was never open");
        self.count = self.count.saturating_sub(other.count);
        self.sum = self.sum.wrapping_sub(other.sum);
    }

    /// The covering edge if exactly one arc covers the cell.
    #[inline]
    fn single(&self) -> Option<usize> {
        (self.count == 1).then_some(self.sum)
    }
}

#[derive(Clone, Copy, Debug)]
struct Cell {
    event: usize,
    cover: Cover,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Direction, IntegerKernel, RobustKernel};
    use nalgebra::{vector, Vector2};

    fn poly(pts: &[(i64, i64)]) -> Polygon<Vector2<i64>> {
        pts.iter().map(|&(x, y)| vector![x, y]).collect()
    }

    fn assert_top_edges(pgn: &Polygon<Vector2<i64>>, expected: &[(usize, (i64, i64), (i64, i64))]) {
        let k = IntegerKernel;
        let got = top_edges(pgn, &k);
        assert_eq!(got.len(), expected.len(), "got {got:?}");
        for (t, &(edge, (ax, ay), (bx, by))) in got.iter().zip(expected) {
            assert_eq!(t.edge, edge);
            let want = DirectionRange {
                first: Direction::new(ax, ay),
                last: Direction::new(bx, by),
            };
            assert!(t.range.same_as(&k, &want), "edge {edge}: {:?}", t.range);
        }
    }

    #[test]
    fn square_every_edge_single_direction() {
        let sq = poly(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        assert_top_edges(
            &sq,
            &[
                (0, (0, -1), (0, -1)),
                (1, (1, 0), (1, 0)),
                (2, (0, 1), (0, 1)),
                (3, (-1, 0), (-1, 0)),
            ],
        );
    }

    #[test]
    fn right_triangle_ranges_equal_opposite_angles() {
        let tri = poly(&[(0, 0), (1, 0), (0, 1)]);
        assert_top_edges(
            &tri,
            &[
                (0, (0, -1), (1, -1)),
                (1, (1, 0), (0, 1)),
                (2, (-1, 1), (-1, 0)),
            ],
        );
    }

    #[test]
    fn hexagon_is_not_castable() {
        let hex = poly(&[(0, 0), (2, 0), (3, 2), (2, 4), (0, 4), (-1, 2)]);
        assert!(top_edges(&hex, &IntegerKernel).is_empty());
    }

    #[test]
    fn pocket_with_parallel_walls() {
        let pocket = poly(&[(0, 0), (1, -3), (3, -3), (4, -1), (5, -2), (6, 0)]);
        assert_top_edges(&pocket, &[(5, (1, 2), (-1, 3))]);
    }

    #[test]
    fn extend_appends_after_existing_entries() {
        let tri = poly(&[(0, 0), (1, 0), (0, 1)]);
        let mut out = vec![TopEdge {
            edge: 99,
            range: DirectionRange {
                first: Direction::new(1, 0),
                last: Direction::new(1, 0),
            },
        }];
        extend_top_edges(&tri, &IntegerKernel, &mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].edge, 99);
        assert_eq!(out[1].edge, 0);
    }

    #[test]
    fn clockwise_input_gives_the_same_ranges() {
        let cw = Polygon::new(vec![vector![0.0, 0.0], vector![0.0, 1.0], vector![1.0, 0.0]]);
        let k = RobustKernel;
        let got = top_edges(&cw, &k);
        assert_eq!(got.len(), 3);
        let hyp = got.iter().find(|t| t.edge == 1).unwrap();
        let want = DirectionRange {
            first: Direction::new(1.0, 0.0),
            last: Direction::new(0.0, 1.0),
        };
        assert!(hyp.range.same_as(&k, &want));
    }
}
