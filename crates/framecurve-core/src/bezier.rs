//! Cubic Bézier spline descriptions and their rasterization into a LUT.
//!
//! A description is a `|`-separated list of points, each written as
//! `handle1x;handle1y#pointx;pointy#handle2x;handle2y` in the 0-255 range
//! (handles may lie outside it). Consecutive points define one cubic
//! segment: `point[i]`, `handle2[i]`, `handle1[i+1]`, `point[i+1]`.
//!
//! Parsing is lenient. Groups that are not exactly three positions of two
//! numbers each are dropped, and segments whose end lies left of their
//! start are skipped. Whatever is left uncovered keeps its previous value.

use crate::lut::CurveLut;
use tracing::{debug, trace};

/// Upper bound on samples per segment, reached only with x far outside 0-255.
const MAX_SEGMENT_SAMPLES: usize = 4096;

/// A 2D position in the 0-255 curve space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point on the spline with its incoming and outgoing handles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BezierPoint {
    pub handle1: Position,
    pub point: Position,
    pub handle2: Position,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a spline description, silently dropping malformed groups.
pub fn parse_spline(description: &str) -> Vec<BezierPoint> {
    description
        .split('|')
        .filter(|group| !group.is_empty())
        .filter_map(|group| {
            let parsed = parse_group(group);
            if parsed.is_none() {
                debug!(group, "Dropping malformed spline point");
            }
            parsed
        })
        .collect()
}

fn parse_group(group: &str) -> Option<BezierPoint> {
    let positions: Vec<&str> = group.split('#').filter(|s| !s.is_empty()).collect();
    if positions.len() != 3 {
        return None;
    }
    Some(BezierPoint {
        handle1: parse_position(positions[0])?,
        point: parse_position(positions[1])?,
        handle2: parse_position(positions[2])?,
    })
}

fn parse_position(text: &str) -> Option<Position> {
    let coords: Vec<&str> = text.split(';').filter(|s| !s.is_empty()).collect();
    if coords.len() != 2 {
        return None;
    }
    let x: f64 = coords[0].trim().parse().ok()?;
    let y: f64 = coords[1].trim().parse().ok()?;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Position { x, y })
}

// ============================================================================
// Sampling
// ============================================================================

/// Point on the cubic Bézier curve `p` at parameter `t` (0-1).
///
/// `p` is `[start, control1, control2, end]`.
pub fn point_on_bezier(t: f64, p: &[Position; 4]) -> Position {
    // Bernstein basis polynomials of degree 3
    let u = 1.0 - t;
    let c0 = u * u * u;
    let c1 = 3.0 * t * u * u;
    let c2 = 3.0 * t * t * u;
    let c3 = t * t * t;
    Position {
        x: p[0].x * c0 + p[1].x * c1 + p[2].x * c2 + p[3].x * c3,
        y: p[0].y * c0 + p[1].y * c1 + p[2].y * c2 + p[3].y * c3,
    }
}

/// Write every segment of the spline into `lut`.
///
/// Returns which of the 256 entries were written.
pub fn rasterize(points: &[BezierPoint], lut: &mut CurveLut) -> [bool; 256] {
    let mut covered = [false; 256];

    for (i, pair) in points.windows(2).enumerate() {
        let mut p = [
            pair[0].point,
            pair[0].handle2,
            pair[1].handle1,
            pair[1].point,
        ];

        if p[0].x > p[3].x {
            debug!(segment = i, "Skipping spline segment running right to left");
            continue;
        }
        // Keep handles inside the segment's x range so one x maps to one y.
        p[1].x = p[1].x.clamp(p[0].x, p[3].x);
        p[2].x = p[2].x.clamp(p[0].x, p[3].x);

        let samples = sample_segment(&p);
        trace!(segment = i, samples = samples.len(), "Rasterizing spline segment");

        let first = (p[0].x.floor() as i64).max(0);
        let last = (p[3].x.floor() as i64).min(255);
        let mut cursor = 0;
        for target in first..=last {
            let tx = target as f64;
            // Samples are monotone in x; only ever walk forward.
            while cursor + 1 < samples.len()
                && (tx - samples[cursor + 1].x).abs() <= (tx - samples[cursor].x).abs()
            {
                cursor += 1;
            }

            let y = samples[cursor].y;
            let idx = target as usize;
            lut.map[idx] = y.round().clamp(0.0, 255.0) as u8;
            lut.luma_ratio[idx] = y / 255.0 / if idx == 0 { 1.0 } else { tx / 255.0 };
            covered[idx] = true;
        }
    }

    covered
}

/// Evenly spaced samples over `t` in 0..=1, about three per unit of x.
fn sample_segment(p: &[Position; 4]) -> Vec<Position> {
    let span = ((p[3].x - p[0].x) * 3.0).round();
    // Points with the same x still get both ends sampled.
    let count = (span as usize).clamp(1, MAX_SEGMENT_SAMPLES);
    (0..=count)
        .map(|k| point_on_bezier(k as f64 / count as f64, p))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const S_CURVE: &str = "0;0#0;0#64;0|64;255#128;255#192;255|192;255#255;255#255;255";

    #[test]
    fn test_parse_well_formed() {
        let points = parse_spline(S_CURVE);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].handle2, Position::new(64.0, 0.0));
        assert_eq!(points[1].handle1, Position::new(64.0, 255.0));
        assert_eq!(points[1].point, Position::new(128.0, 255.0));
        assert_eq!(points[2].point, Position::new(255.0, 255.0));
    }

    #[test]
    fn test_parse_fractional_and_negative_handles() {
        let points = parse_spline("-10.5;0#0.25;1.75#30;-4");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].handle1, Position::new(-10.5, 0.0));
        assert_eq!(points[0].point, Position::new(0.25, 1.75));
    }

    #[test]
    fn test_parse_drops_malformed_groups() {
        // Two positions, three coordinates, non-numeric, then one good group.
        let points = parse_spline("0;0#0;0|0;0;0#1;1#2;2|a;b#1;1#2;2|1;1#2;2#3;3");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].point, Position::new(2.0, 2.0));
    }

    #[test]
    fn test_parse_ignores_empty_tokens() {
        let points = parse_spline("||0;0#0;0#0;0||255;255##255;255#255;255|");
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(parse_spline("inf;0#0;0#0;0").is_empty());
        assert!(parse_spline("0;NaN#0;0#0;0").is_empty());
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_spline("").is_empty());
    }

    #[test]
    fn test_point_on_bezier_endpoints() {
        let p = [
            Position::new(0.0, 0.0),
            Position::new(10.0, 50.0),
            Position::new(20.0, 80.0),
            Position::new(30.0, 90.0),
        ];
        assert_eq!(point_on_bezier(0.0, &p), p[0]);
        assert_eq!(point_on_bezier(1.0, &p), p[3]);
    }

    #[test]
    fn test_point_on_bezier_straight_line() {
        let p = [
            Position::new(0.0, 0.0),
            Position::new(1.0, 1.0),
            Position::new(2.0, 2.0),
            Position::new(3.0, 3.0),
        ];
        let mid = point_on_bezier(0.5, &p);
        assert!((mid.x - 1.5).abs() < 1e-12);
        assert!((mid.y - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_sample_count_scales_with_width() {
        let p = [
            Position::new(0.0, 0.0),
            Position::new(0.0, 0.0),
            Position::new(10.0, 10.0),
            Position::new(10.0, 10.0),
        ];
        assert_eq!(sample_segment(&p).len(), 31);

        let flat = [Position::new(5.0, 0.0); 4];
        assert_eq!(sample_segment(&flat).len(), 2);
    }

    #[test]
    fn test_rasterize_s_curve_covers_everything() {
        let mut lut = CurveLut::identity();
        let covered = rasterize(&parse_spline(S_CURVE), &mut lut);
        assert!(covered.iter().all(|&c| c));
        for i in 1..256 {
            assert!(lut.map[i] >= lut.map[i - 1], "not monotone at {}", i);
        }
        assert_eq!(lut.map[0], 0);
        assert_eq!(lut.map[255], 255);
        assert_eq!(lut.map[200], 255);
    }

    #[test]
    fn test_rasterize_identity_segment() {
        let mut lut = CurveLut::identity();
        let points = parse_spline("0;0#0;0#85;85|170;170#255;255#255;255");
        rasterize(&points, &mut lut);
        for i in 0..256 {
            assert!(
                (lut.map[i] as i32 - i as i32).abs() <= 1,
                "straight spline at {} gave {}",
                i,
                lut.map[i]
            );
        }
    }

    #[test]
    fn test_rasterize_skips_reversed_segment() {
        let mut lut = CurveLut::identity();
        let points = parse_spline("200;0#200;0#200;0|50;255#50;255#50;255");
        let covered = rasterize(&points, &mut lut);
        assert!(covered.iter().all(|&c| !c));
        assert!(lut.is_identity());
    }

    #[test]
    fn test_rasterize_partial_range() {
        let mut lut = CurveLut::identity();
        // Constant 0 output over 100..=150 only.
        let points = parse_spline("100;0#100;0#100;0|150;0#150;0#150;0");
        let covered = rasterize(&points, &mut lut);
        assert!(!covered[99]);
        assert!(covered[100] && covered[150]);
        assert!(!covered[151]);
        assert_eq!(lut.map[99], 99);
        assert_eq!(lut.map[120], 0);
        assert_eq!(lut.map[151], 151);
        assert_eq!(lut.luma_ratio[120], 0.0);
    }

    #[test]
    fn test_rasterize_clips_outside_range() {
        let mut lut = CurveLut::identity();
        let points = parse_spline("-50;-50#-50;-50#0;0|300;300#300;300#300;300");
        let covered = rasterize(&points, &mut lut);
        assert!(covered.iter().all(|&c| c));
        assert_eq!(lut.map[0], 0);
        assert_eq!(lut.map[255], 255);
    }

    #[test]
    fn test_luma_ratio_at_zero_uses_unit_divisor() {
        let mut lut = CurveLut::identity();
        let points = parse_spline("0;51#0;51#0;51|10;51#10;51#10;51");
        rasterize(&points, &mut lut);
        assert!((lut.luma_ratio[0] - 0.2).abs() < 1e-12);
        assert!((lut.luma_ratio[5] - 51.0 / 5.0).abs() < 1e-9);
    }
}
