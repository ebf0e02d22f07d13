//! Scattered-data linear interpolation
//!
//! Linear barycentric interpolation over the Delaunay triangulation of a
//! scattered (x, y) -> value point set. Queries outside the convex hull of
//! the input points evaluate to NaN.

use delaunator::{triangulate, Point};

use crate::core::{DashError, DashResult};

// Tolerance for the point-in-triangle test: a query sitting exactly on an
// edge shared by two triangles must land in one of them.
const EDGE_EPS: f64 = 1e-12;

/// Linear interpolator over a Delaunay triangulation of scattered points
#[derive(Debug)]
pub struct ScatteredInterpolator {
    points: Vec<Point>,
    values: Vec<f64>,
    /// Flat triangle list: triples of indices into `points`
    triangles: Vec<usize>,
}

impl ScatteredInterpolator {
    /// Build an interpolator from parallel coordinate/value slices.
    ///
    /// Fails with `Degenerate` when fewer than 3 points are supplied or the
    /// points are collinear, since no triangulation exists in either case.
    pub fn new(xs: &[f64], ys: &[f64], values: &[f64]) -> DashResult<Self> {
        if xs.len() != ys.len() || xs.len() != values.len() {
            return Err(DashError::invalid_input(
                "coordinate and value slices must have equal length",
            ));
        }
        if xs.len() < 3 {
            return Err(DashError::degenerate(format!(
                "need at least 3 scattered points, got {}",
                xs.len()
            )));
        }

        let points: Vec<Point> = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| Point { x, y })
            .collect();

        let triangulation = triangulate(&points);
        if triangulation.triangles.is_empty() {
            return Err(DashError::degenerate(
                "scattered points are collinear; no triangulation exists",
            ));
        }

        Ok(Self {
            points,
            values: values.to_vec(),
            triangles: triangulation.triangles,
        })
    }

    /// Interpolated value at (x, y); NaN outside the convex hull.
    pub fn interpolate(&self, x: f64, y: f64) -> f64 {
        for tri in self.triangles.chunks_exact(3) {
            let (ia, ib, ic) = (tri[0], tri[1], tri[2]);
            let a = &self.points[ia];
            let b = &self.points[ib];
            let c = &self.points[ic];

            let Some((wa, wb, wc)) = barycentric_weights(a, b, c, x, y) else {
                continue;
            };

            if wa >= -EDGE_EPS && wb >= -EDGE_EPS && wc >= -EDGE_EPS {
                return wa * self.values[ia] + wb * self.values[ib] + wc * self.values[ic];
            }
        }

        f64::NAN
    }

    /// Number of triangles in the triangulation
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Barycentric coordinates of (x, y) with respect to triangle (a, b, c).
/// Returns None for a zero-area triangle.
fn barycentric_weights(
    a: &Point,
    b: &Point,
    c: &Point,
    x: f64,
    y: f64,
) -> Option<(f64, f64, f64)> {
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < f64::EPSILON {
        return None;
    }

    let wa = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / det;
    let wb = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / det;
    let wc = 1.0 - wa - wb;

    Some((wa, wb, wc))
}
