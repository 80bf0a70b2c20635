//! 256-entry lookup tables built from a fitted curve or a Bézier spline.

use crate::bezier::{parse_spline, rasterize};
use crate::spline::{sort_points, SplineCoefficients};
use crate::CurvePoint;
use tracing::debug;

// ============================================================================
// LUT Type
// ============================================================================

/// Pre-computed lookup table for efficient curve application.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveLut {
    /// Intensity map: `map[input] = output`
    pub map: [u8; 256],
    /// Output/input ratio per luma value, used to scale RGB in luma mode.
    pub luma_ratio: [f64; 256],
}

impl CurveLut {
    /// Create identity LUT (no change).
    ///
    /// The ratio table holds `i / 255`, which is also what a spline leaves
    /// in place wherever it does not reach.
    pub fn identity() -> Self {
        let mut map = [0u8; 256];
        let mut luma_ratio = [0.0; 256];
        for i in 0..256 {
            map[i] = i as u8;
            luma_ratio[i] = i as f64 / 255.0;
        }
        Self { map, luma_ratio }
    }

    /// Build the table from a fitted curve.
    pub fn from_spline(spline: &SplineCoefficients) -> Self {
        let mut map = [0u8; 256];
        let mut luma_ratio = [0.0; 256];
        for i in 0..256 {
            let v = i as f64 / 255.0;
            let w = spline.evaluate(v);
            map[i] = (w.clamp(0.0, 1.0) * 255.0).round() as u8;
            luma_ratio[i] = if i == 0 { w } else { w / v };
        }
        Self { map, luma_ratio }
    }

    /// Sort control points by x, fit them and build the table.
    pub fn from_points(points: &[CurvePoint]) -> Self {
        let mut sorted = points.to_vec();
        sort_points(&mut sorted);
        Self::from_spline(&SplineCoefficients::fit(&sorted))
    }

    /// Build the table from a Bézier spline description.
    ///
    /// Entries no segment reaches keep their identity values.
    pub fn from_bezier_spline(description: &str) -> Self {
        let mut lut = Self::identity();
        let points = parse_spline(description);
        let covered = rasterize(&points, &mut lut);
        let uncovered = covered.iter().filter(|&&c| !c).count();
        debug!(
            points = points.len(),
            uncovered, "Rebuilt lookup table from Bézier spline"
        );
        lut
    }

    /// Check if the intensity map is identity.
    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &v)| v == i as u8)
    }
}

impl Default for CurveLut {
    fn default() -> Self {
        Self::identity()
    }
}

/// Curve heights for the overlay graph: `scale` samples over 0..1, in pixels.
pub fn overlay_samples(spline: &SplineCoefficients, scale: usize) -> Vec<f32> {
    (0..scale)
        .map(|i| (spline.evaluate(i as f64 / scale as f64) * scale as f64) as f32)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<CurvePoint> {
        coords.iter().map(|&(x, y)| CurvePoint::new(x, y)).collect()
    }

    #[test]
    fn test_identity_lut() {
        let lut = CurveLut::identity();
        assert!(lut.is_identity());
        assert_eq!(lut.luma_ratio[0], 0.0);
        assert!((lut.luma_ratio[255] - 1.0).abs() < 1e-12);
        assert!((lut.luma_ratio[51] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_linear_points_produce_identity() {
        let lut = CurveLut::from_points(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        for i in 0..256 {
            assert_eq!(lut.map[i], i as u8, "LUT mismatch at {}", i);
        }
        for i in 1..256 {
            assert!((lut.luma_ratio[i] - 1.0).abs() < 1e-9, "ratio at {} is {}", i, lut.luma_ratio[i]);
        }
    }

    #[test]
    fn test_unsorted_points_are_sorted_first() {
        let sorted = CurveLut::from_points(&pts(&[(0.0, 0.0), (0.3, 0.1), (0.7, 0.9), (1.0, 1.0)]));
        let shuffled = CurveLut::from_points(&pts(&[(0.7, 0.9), (1.0, 1.0), (0.0, 0.0), (0.3, 0.1)]));
        assert_eq!(sorted, shuffled);
    }

    #[test]
    fn test_s_curve_increases_contrast() {
        let lut = CurveLut::from_points(&pts(&[
            (0.0, 0.0),
            (0.25, 0.15),
            (0.75, 0.85),
            (1.0, 1.0),
        ]));
        assert!(lut.map[64] < 64, "Shadows not darkened");
        assert!(lut.map[192] > 192, "Highlights not brightened");
    }

    #[test]
    fn test_inverted_curve() {
        let lut = CurveLut::from_points(&pts(&[(0.0, 1.0), (1.0, 0.0)]));
        assert_eq!(lut.map[0], 255);
        assert_eq!(lut.map[255], 0);
        // Ratio at zero is the raw curve value.
        assert!((lut.luma_ratio[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overshooting_curve_is_clamped() {
        // A parabola through these points leaves 0..1 near the ends.
        let lut = CurveLut::from_points(&pts(&[(0.2, 0.0), (0.5, 1.0), (0.8, 0.0)]));
        assert_eq!(lut.map[0], 0);
        assert_eq!(lut.map[128], 255);
        assert!(lut.luma_ratio[0] < 0.0);
    }

    #[test]
    fn test_bezier_lut_defaults_outside_segments() {
        let lut = CurveLut::from_bezier_spline("0;0#0;0#0;0");
        assert_eq!(lut, CurveLut::identity());

        let lut = CurveLut::from_bezier_spline("0;0#0;0");
        assert_eq!(lut, CurveLut::identity());
    }

    #[test]
    fn test_bezier_lut_malformed_group_leaves_gap_at_identity() {
        // The first group has only two positions; the remaining points span 200..=255.
        let lut = CurveLut::from_bezier_spline("0;0#0;0|200;0#200;0#200;0|255;0#255;0#255;0");
        assert_eq!(lut.map[100], 100);
        assert_eq!(lut.map[199], 199);
        assert_eq!(lut.map[200], 0);
        assert_eq!(lut.map[255], 0);
    }

    #[test]
    fn test_overlay_samples() {
        let spline = SplineCoefficients::fit(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        let samples = overlay_samples(&spline, 100);
        assert_eq!(samples.len(), 100);
        assert!((samples[0] - 0.0).abs() < 1e-4);
        assert!((samples[50] - 50.0).abs() < 1e-4);
        assert!((samples[99] - 99.0).abs() < 1e-4);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
