//! Curve fitting through control points.
//!
//! The fit depends on how many points are active:
//!
//! - 2 points: straight line `y = a*x + b`
//! - 3 points: parabola `y = a*x^2 + b*x + c`
//! - 4+ points: natural cubic spline (zero second derivative at both ends)
//!
//! Points must be sorted by x (see [`sort_points`]). Duplicate x values are
//! not rejected; they produce a degenerate curve, not an error.

use crate::solver::AugmentedMatrix;
use crate::CurvePoint;

// ============================================================================
// Coefficients
// ============================================================================

/// One knot of a natural cubic spline.
///
/// The knot anchors the segment that ends at it: for `x` in `(x[i-1], x[i]]`
/// the curve is `y + b*dx + c/2*dx^2 + d/6*dx^3` with `dx = x - x[i]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CubicKnot {
    pub x: f64,
    pub y: f64,
    /// First derivative at the knot.
    pub b: f64,
    /// Second derivative at the knot.
    pub c: f64,
    /// Third derivative over the segment ending at the knot.
    pub d: f64,
}

/// Fitted curve coefficients; the shape follows the number of points.
#[derive(Debug, Clone, PartialEq)]
pub enum SplineCoefficients {
    /// Fewer than two points: `y = x`.
    Identity,
    /// `y = a*x + b`
    Linear { a: f64, b: f64 },
    /// `y = a*x^2 + b*x + c`
    Quadratic { a: f64, b: f64, c: f64 },
    /// Natural cubic spline, one knot per control point.
    Cubic(Vec<CubicKnot>),
}

impl SplineCoefficients {
    /// Fit coefficients through sorted control points.
    pub fn fit(points: &[CurvePoint]) -> Self {
        match points.len() {
            0 | 1 => SplineCoefficients::Identity,
            2 => {
                let rows: Vec<Vec<f64>> = points.iter().map(|p| vec![p.x, 1.0, p.y]).collect();
                let s = AugmentedMatrix::from_rows(&rows).solve();
                SplineCoefficients::Linear { a: s[0], b: s[1] }
            }
            3 => {
                let rows: Vec<Vec<f64>> = points
                    .iter()
                    .map(|p| vec![p.x * p.x, p.x, 1.0, p.y])
                    .collect();
                let s = AugmentedMatrix::from_rows(&rows).solve();
                SplineCoefficients::Quadratic {
                    a: s[0],
                    b: s[1],
                    c: s[2],
                }
            }
            _ => SplineCoefficients::Cubic(natural_cubic_knots(points)),
        }
    }

    /// Evaluate the curve at `x`.
    ///
    /// Outside the control point range the cubic spline extrapolates its
    /// first or last segment.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            SplineCoefficients::Identity => x,
            SplineCoefficients::Linear { a, b } => a * x + b,
            SplineCoefficients::Quadratic { a, b, c } => (a * x + b) * x + c,
            SplineCoefficients::Cubic(knots) => {
                let knot = &knots[find_segment(knots, x)];
                let dx = x - knot.x;
                ((knot.d * dx / 6.0 + knot.c / 2.0) * dx + knot.b) * dx + knot.y
            }
        }
    }

    /// Second derivative of the curve at `x`.
    pub fn second_derivative(&self, x: f64) -> f64 {
        match self {
            SplineCoefficients::Identity | SplineCoefficients::Linear { .. } => 0.0,
            SplineCoefficients::Quadratic { a, .. } => 2.0 * a,
            SplineCoefficients::Cubic(knots) => {
                let knot = &knots[find_segment(knots, x)];
                knot.c + knot.d * (x - knot.x)
            }
        }
    }
}

// ============================================================================
// Natural Cubic Spline
// ============================================================================

/// Solve the tridiagonal system for the second derivatives with the sweep
/// method, then derive slopes and third derivatives per segment.
fn natural_cubic_knots(points: &[CurvePoint]) -> Vec<CubicKnot> {
    let n = points.len();
    let mut knots: Vec<CubicKnot> = points
        .iter()
        .map(|p| CubicKnot {
            x: p.x,
            y: p.y,
            ..CubicKnot::default()
        })
        .collect();

    // Forward sweep. c[0] = c[n-1] = 0 stay untouched (natural boundary).
    let mut alpha = vec![0.0; n - 1];
    let mut beta = vec![0.0; n - 1];
    for i in 1..n - 1 {
        let h_i = points[i].x - points[i - 1].x;
        let h_next = points[i + 1].x - points[i].x;
        let diag = 2.0 * (h_i + h_next);
        let rhs = 6.0
            * ((points[i + 1].y - points[i].y) / h_next - (points[i].y - points[i - 1].y) / h_i);
        let z = h_i * alpha[i - 1] + diag;
        alpha[i] = -h_next / z;
        beta[i] = (rhs - h_i * beta[i - 1]) / z;
    }

    // Back substitution for the second derivatives.
    for i in (1..n - 1).rev() {
        knots[i].c = alpha[i] * knots[i + 1].c + beta[i];
    }

    for i in (1..n).rev() {
        let h = points[i].x - points[i - 1].x;
        let c_prev = knots[i - 1].c;
        let knot = &mut knots[i];
        knot.d = (knot.c - c_prev) / h;
        knot.b = h * (2.0 * knot.c + c_prev) / 6.0 + (points[i].y - points[i - 1].y) / h;
    }

    knots
}

/// Index of the knot anchoring the segment that contains `x`.
///
/// Connection points belong to the segment they end. Values outside the
/// range use the first or last segment.
fn find_segment(knots: &[CubicKnot], x: f64) -> usize {
    let last = knots.len() - 1;
    if x <= knots[0].x {
        return 1;
    }
    if x >= knots[last].x {
        return last;
    }

    let mut low = 0;
    let mut high = last;
    while low + 1 < high {
        let mid = low + (high - low) / 2;
        if x <= knots[mid].x {
            high = mid;
        } else {
            low = mid;
        }
    }
    high
}

// ============================================================================
// Point Ordering
// ============================================================================

/// Sort control points by x in place.
///
/// Insertion sort: at most five points, and equal x values keep their order.
pub fn sort_points(points: &mut [CurvePoint]) {
    for i in 1..points.len() {
        let mut j = i;
        while j > 0 && points[j].x < points[j - 1].x {
            points.swap(j, j - 1);
            j -= 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
