//! Plain-text polygons, directions and expected-result case files.
//!
//! Formats (whitespace-separated tokens, line breaks insignificant)
//! - Polygon: `n x0 y0 x1 y1 … x{n-1} y{n-1}`.
//! - Direction: `dx dy`.
//! - Case: a polygon, then `k`, then `k` entries `edge dx1 dy1 dx2 dy2`
//!   (the top edges with their closed pullout ranges, any order).
//!
//! Trailing tokens after a complete item are ignored. Parsing never checks
//! geometric preconditions; run `Polygon::validate` for that.

use std::cmp::Ordering;
use std::fmt;
use std::str::{FromStr, SplitWhitespace};

use nalgebra::{Scalar, Vector2};

use crate::casting::{DirectionRange, TopEdge};
use crate::kernel::{CastingKernel, Direction};
use crate::polygon::Polygon;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedEnd { expected: &'static str },
    InvalidToken { token: String, expected: &'static str },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            Self::InvalidToken { token, expected } => {
                write!(f, "invalid token `{token}`, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A polygon together with the top edges it is expected to have.
#[derive(Clone, Debug, PartialEq)]
pub struct CastingCase<T: Scalar> {
    pub polygon: Polygon<Vector2<T>>,
    pub expected: Vec<TopEdge<Direction<T>>>,
}

struct Tokens<'a>(SplitWhitespace<'a>);

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self(text.split_whitespace())
    }

    fn next<V: FromStr>(&mut self, expected: &'static str) -> Result<V, ParseError> {
        let token = self.0.next().ok_or(ParseError::UnexpectedEnd { expected })?;
        token.parse().map_err(|_| ParseError::InvalidToken {
            token: token.to_string(),
            expected,
        })
    }

    fn polygon<T>(&mut self) -> Result<Polygon<Vector2<T>>, ParseError>
    where
        T: Scalar + Copy + FromStr,
    {
        let n: usize = self.next("vertex count")?;
        let mut vertices = Vec::with_capacity(n.min(1 << 16));
        for _ in 0..n {
            let x = self.next("x coordinate")?;
            let y = self.next("y coordinate")?;
            vertices.push(Vector2::new(x, y));
        }
        Ok(Polygon::new(vertices))
    }

    fn direction<T: Scalar + Copy + FromStr>(&mut self) -> Result<Direction<T>, ParseError> {
        let dx = self.next("direction dx")?;
        let dy = self.next("direction dy")?;
        Ok(Direction::new(dx, dy))
    }
}

pub fn parse_polygon<T>(text: &str) -> Result<Polygon<Vector2<T>>, ParseError>
where
    T: Scalar + Copy + FromStr,
{
    Tokens::new(text).polygon()
}

pub fn parse_direction<T>(text: &str) -> Result<Direction<T>, ParseError>
where
    T: Scalar + Copy + FromStr,
{
    Tokens::new(text).direction()
}

pub fn parse_case<T: Scalar + Copy + FromStr>(text: &str) -> Result<CastingCase<T>, ParseError> {
    let mut tokens = Tokens::new(text);
    let polygon = tokens.polygon()?;
    let k: usize = tokens.next("top edge count")?;
    let mut expected = Vec::with_capacity(k.min(polygon.len()));
    for _ in 0..k {
        let edge = tokens.next("edge index")?;
        let first = tokens.direction()?;
        let last = tokens.direction()?;
        expected.push(TopEdge {
            edge,
            range: DirectionRange { first, last },
        });
    }
    Ok(CastingCase { polygon, expected })
}

/// Render a case in the format read by [`parse_case`].
pub fn format_case<T>(polygon: &Polygon<Vector2<T>>, top_edges: &[TopEdge<Direction<T>>]) -> String
where
    T: Scalar + fmt::Display,
{
    let mut out = format!("{polygon}\n{}\n", top_edges.len());
    for t in top_edges {
        out.push_str(&t.to_string());
        out.push('\n');
    }
    out
}

/// First difference between obtained and expected top edges.
#[derive(Clone, Debug, PartialEq)]
pub enum Mismatch<D> {
    Count {
        obtained: usize,
        expected: usize,
    },
    Entry {
        position: usize,
        obtained: TopEdge<D>,
        expected: TopEdge<D>,
    },
}

impl<D: fmt::Display> fmt::Display for Mismatch<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count { obtained, expected } => {
                write!(f, "obtained {obtained} top edges, expected {expected}")
            }
            Self::Entry {
                position,
                obtained,
                expected,
            } => write!(
                f,
                "entry {position}: obtained `{obtained}`, expected `{expected}`"
            ),
        }
    }
}

impl<D: fmt::Debug + fmt::Display> std::error::Error for Mismatch<D> {}

/// Compare two top-edge lists independent of their order.
///
/// Both sides are sorted by edge index, then by range endpoints in angle
/// order; directions are compared geometrically, so `(1, 0)` matches `(2, 0)`.
pub fn compare_with_expected<K: CastingKernel>(
    obtained: &[TopEdge<K::Direction>],
    expected: &[TopEdge<K::Direction>],
    kernel: &K,
) -> Result<(), Mismatch<K::Direction>> {
    if obtained.len() != expected.len() {
        return Err(Mismatch::Count {
            obtained: obtained.len(),
            expected: expected.len(),
        });
    }
    let order = |a: &TopEdge<K::Direction>, b: &TopEdge<K::Direction>| -> Ordering {
        a.edge
            .cmp(&b.edge)
            .then_with(|| kernel.compare_angle(&a.range.first, &b.range.first))
            .then_with(|| kernel.compare_angle(&a.range.last, &b.range.last))
    };
    let mut got = obtained.to_vec();
    let mut want = expected.to_vec();
    got.sort_by(order);
    want.sort_by(order);
    for (position, (g, w)) in got.into_iter().zip(want).enumerate() {
        if g.edge != w.edge || !g.range.same_as(kernel, &w.range) {
            return Err(Mismatch::Entry {
                position,
                obtained: g,
                expected: w,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::top_edges;
    use crate::kernel::{IntegerKernel, RobustKernel};
    use nalgebra::vector;

    const TRIANGLE_CASE: &str = "3\n0 0\n1 0\n0 1\n3\n1 1 0 0 1\n0 0 -1 1 -1\n2 -1 1 -1 0\n";

    #[test]
    fn parses_polygon_across_lines() {
        let p: Polygon<Vector2<i64>> = parse_polygon("4\n0 0  1 0\n1 1\t0 1").unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.vertices()[2], vector![1, 1]);
        let f: Polygon<Vector2<f64>> = parse_polygon("3 0 0 0.5 0 0 2.5 ignored").unwrap();
        assert_eq!(f.vertices()[2], vector![0.0, 2.5]);
    }

    fn vertex_count<T: Scalar + Copy + FromStr>(text: &str) -> usize {
        let case: CastingCase<T> = parse_case(text).unwrap();
        assert_eq!(case.polygon.len(), parse_polygon::<T>(text).unwrap().len());
        case.polygon.len()
    }

    #[test]
    fn parsers_work_for_any_copy_scalar() {
        assert_eq!(vertex_count::<i64>(TRIANGLE_CASE), 3);
        assert_eq!(vertex_count::<f64>(TRIANGLE_CASE), 3);
        assert_eq!(vertex_count::<i32>(TRIANGLE_CASE), 3);
    }

    #[test]
    fn reports_truncated_and_malformed_input() {
        assert_eq!(
            parse_polygon::<i64>("3 0 0 1 0 0"),
            Err(ParseError::UnexpectedEnd {
                expected: "y coordinate"
            })
        );
        let err = parse_polygon::<i64>("3 0 0 1.5 0 0 1").unwrap_err();
        assert_eq!(err.to_string(), "invalid token `1.5`, expected x coordinate");
        assert!(matches!(
            parse_direction::<f64>("1 up"),
            Err(ParseError::InvalidToken { .. })
        ));
        assert!(matches!(
            parse_case::<i64>("3 0 0 1 0 0 1"),
            Err(ParseError::UnexpectedEnd {
                expected: "top edge count"
            })
        ));
    }

    #[test]
    fn triangle_case_matches_enumeration_in_any_order() {
        let case: CastingCase<i64> = parse_case(TRIANGLE_CASE).unwrap();
        assert_eq!(case.expected.len(), 3);
        let got = top_edges(&case.polygon, &IntegerKernel);
        assert_eq!(compare_with_expected(&got, &case.expected, &IntegerKernel), Ok(()));

        let fcase: CastingCase<f64> = parse_case(TRIANGLE_CASE).unwrap();
        let fgot = top_edges(&fcase.polygon, &RobustKernel);
        assert!(compare_with_expected(&fgot, &fcase.expected, &RobustKernel).is_ok());
    }

    #[test]
    fn comparison_is_geometric_and_reports_first_difference() {
        let k = IntegerKernel;
        let te = |edge, a: (i64, i64), b: (i64, i64)| TopEdge {
            edge,
            range: DirectionRange {
                first: Direction::new(a.0, a.1),
                last: Direction::new(b.0, b.1),
            },
        };
        let got = [te(1, (1, 0), (0, 1))];
        assert!(compare_with_expected(&got, &[te(1, (3, 0), (0, 7))], &k).is_ok());
        assert_eq!(
            compare_with_expected(&got, &[], &k),
            Err(Mismatch::Count {
                obtained: 1,
                expected: 0
            })
        );
        let err = compare_with_expected(&got, &[te(1, (1, 0), (-1, 1))], &k).unwrap_err();
        assert_eq!(
            err.to_string(),
            "entry 0: obtained `1 1 0 0 1`, expected `1 1 0 -1 1`"
        );
    }

    #[test]
    fn formatted_case_parses_back() {
        let tri: Polygon<Vector2<i64>> = parse_polygon("3 0 0 1 0 0 1").unwrap();
        let tops = top_edges(&tri, &IntegerKernel);
        let text = format_case(&tri, &tops);
        assert!(text.starts_with("3 0 0 1 0 0 1\n3\n0 0 -1 1 -1\n"));
        let case: CastingCase<i64> = parse_case(&text).unwrap();
        assert_eq!(case.polygon, tri);
        assert_eq!(case.expected, tops);
    }
}
