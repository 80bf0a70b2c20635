//! Serializable snapshot of a curves filter's parameters.

use crate::luminance::LumaFormula;
use crate::spline::sort_points;
use crate::{Channel, CurvePoint, GraphPosition, MAX_POINTS};
use serde::{Deserialize, Serialize};

/// Smallest number of control points a curve can be fitted through.
pub const MIN_POINTS: usize = 2;

/// Curves filter parameters.
///
/// Missing fields deserialize to their defaults, so a partial JSON object is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvesConfig {
    /// Channel the curve is applied to
    pub channel: Channel,
    /// Draw the curve graph on the output frame
    pub draw_curves: bool,
    /// Frame corner of the curve graph
    pub graph_position: GraphPosition,
    /// Number of control points in use (2 to 5)
    pub point_number: usize,
    /// Luma weights used in luma mode
    pub luma_formula: LumaFormula,
    /// Bézier spline description; when non-empty it replaces the control points
    pub bezier_spline: String,
    /// All control point slots, only the first `point_number` are active
    pub points: [CurvePoint; MAX_POINTS],
}

impl Default for CurvesConfig {
    fn default() -> Self {
        let mut points = [CurvePoint::default(); MAX_POINTS];
        points[1] = CurvePoint::new(1.0, 1.0);
        Self {
            channel: Channel::Red,
            draw_curves: true,
            graph_position: GraphPosition::BottomRight,
            point_number: MIN_POINTS,
            luma_formula: LumaFormula::Rec709,
            bezier_spline: String::new(),
            points,
        }
    }
}

impl CurvesConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active control points, forced into 2..=5.
    pub fn active_point_count(&self) -> usize {
        self.point_number.clamp(MIN_POINTS, MAX_POINTS)
    }

    /// Active control points sorted by x.
    pub fn sorted_points(&self) -> Vec<CurvePoint> {
        let mut points = self.points[..self.active_point_count()].to_vec();
        sort_points(&mut points);
        points
    }

    /// Whether the Bézier spline replaces the control points.
    pub fn uses_bezier(&self) -> bool {
        !self.bezier_spline.is_empty()
    }
}
