//! Frame filter contract and the curves filter.
//!
//! Every filter takes one source frame and writes one destination frame of
//! the same size per call, synchronously. Parameters are addressed by index,
//! the way video plugin hosts enumerate them, and described by [`ParamInfo`].

use std::fmt;

use image::RgbaImage;
use tracing::{debug, trace};

use crate::config::CurvesConfig;
use crate::error::{check_frame_len, FilterError, Result};
use crate::graph::{draw_curve_graph, graph_scale, CurveGraph};
use crate::luminance::LumaFormula;
use crate::lut::{overlay_samples, CurveLut};
use crate::spline::SplineCoefficients;
use crate::transform::apply_lut;
use crate::{Channel, GraphPosition, MAX_POINTS};

// ============================================================================
// Parameters and Metadata
// ============================================================================

/// Declared kind of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Double,
    Bool,
    String,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Double => write!(f, "double"),
            ParamKind::Bool => write!(f, "bool"),
            ParamKind::String => write!(f, "string"),
        }
    }
}

/// A parameter value passed to or read from a filter.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Double(f64),
    Bool(bool),
    String(String),
}

impl ParamValue {
    /// Numeric view; booleans read as 0 or 1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Double(v) => Some(*v),
            ParamValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ParamValue::String(_) => None,
        }
    }

    /// Boolean view; hosts pass booleans as doubles, where 0.5 and up is true.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Double(v) => Some(*v >= 0.5),
            ParamValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Name, kind and help text of one parameter.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParamInfo {
    pub name: String,
    pub kind: ParamKind,
    pub explanation: String,
}

impl ParamInfo {
    fn new(name: impl Into<String>, kind: ParamKind, explanation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            explanation: explanation.into(),
        }
    }
}

/// Plugin-level metadata.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PluginInfo {
    pub name: &'static str,
    pub author: &'static str,
    pub explanation: &'static str,
    pub major_version: u32,
    pub minor_version: u32,
    pub num_params: usize,
}

// ============================================================================
// Filter Trait
// ============================================================================

/// A stateful RGBA8888 frame filter.
pub trait Filter {
    fn info(&self) -> PluginInfo;

    /// Description of parameter `index`, `None` past the end.
    fn param_info(&self, index: usize) -> Option<ParamInfo>;

    fn set_param(&mut self, index: usize, value: ParamValue) -> Result<()>;

    fn param(&self, index: usize) -> Result<ParamValue>;

    /// Frame size in pixels this instance was built for.
    fn dimensions(&self) -> (u32, u32);

    /// Produce the output frame for time `time` (seconds) from `input`.
    ///
    /// Both buffers must hold exactly `width * height` RGBA pixels.
    fn update(&mut self, time: f64, input: &[u8], output: &mut [u8]) -> Result<()>;

    /// Run [`Filter::update`] on an image and return the result as a new image.
    fn process_image(&mut self, time: f64, image: &RgbaImage) -> Result<RgbaImage> {
        let (width, height) = self.dimensions();
        if image.dimensions() != (width, height) {
            return Err(FilterError::Dimensions {
                width,
                height,
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }
        let mut output = RgbaImage::new(width, height);
        self.update(time, image.as_raw(), &mut output)?;
        Ok(output)
    }
}

/// Pull the value kind a parameter expects, or report a type error.
pub(crate) fn expect_f64(index: usize, value: &ParamValue) -> Result<f64> {
    value.as_f64().ok_or(FilterError::ParamType {
        index,
        expected: ParamKind::Double,
    })
}

pub(crate) fn expect_bool(index: usize, value: &ParamValue) -> Result<bool> {
    value.as_bool().ok_or(FilterError::ParamType {
        index,
        expected: ParamKind::Bool,
    })
}

// ============================================================================
// Curves Filter
// ============================================================================

const PARAM_CHANNEL: usize = 0;
const PARAM_DRAW_CURVES: usize = 1;
const PARAM_GRAPH_POSITION: usize = 2;
const PARAM_POINT_NUMBER: usize = 3;
const PARAM_LUMA_FORMULA: usize = 4;
const PARAM_BEZIER_SPLINE: usize = 5;
/// Index of the first control point scalar; point `k` input is at `FIRST_POINT_PARAM + 2k`.
pub const FIRST_POINT_PARAM: usize = 6;
const NUM_PARAMS: usize = FIRST_POINT_PARAM + 2 * MAX_POINTS;

/// Tone curve filter.
///
/// In control point mode the table is rebuilt on every frame. In Bézier
/// mode it is rebuilt only when the spline description changes, and the
/// curve graph is never drawn.
#[derive(Debug, Clone)]
pub struct CurvesFilter {
    width: u32,
    height: u32,
    config: CurvesConfig,
    bezier_lut: CurveLut,
}

impl CurvesFilter {
    /// Create a filter for `width x height` frames with default parameters.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, CurvesConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: CurvesConfig) -> Self {
        let bezier_lut = CurveLut::from_bezier_spline(&config.bezier_spline);
        let mut filter = Self {
            width,
            height,
            config,
            bezier_lut,
        };
        filter.set_point_number(filter.config.point_number);
        filter
    }

    pub fn config(&self) -> &CurvesConfig {
        &self.config
    }

    /// Replace every parameter at once.
    pub fn apply_config(&mut self, config: CurvesConfig) {
        let spline = config.bezier_spline.clone();
        self.config = CurvesConfig {
            bezier_spline: self.config.bezier_spline.clone(),
            ..config
        };
        self.set_point_number(self.config.point_number);
        self.set_bezier_spline(spline);
    }

    pub fn set_channel(&mut self, channel: Channel) {
        self.config.channel = channel;
    }

    pub fn set_draw_curves(&mut self, draw: bool) {
        self.config.draw_curves = draw;
    }

    pub fn set_graph_position(&mut self, position: GraphPosition) {
        self.config.graph_position = position;
    }

    pub fn set_point_number(&mut self, count: usize) {
        self.config.point_number = count.clamp(crate::config::MIN_POINTS, MAX_POINTS);
    }

    pub fn set_luma_formula(&mut self, formula: LumaFormula) {
        self.config.luma_formula = formula;
    }

    /// Set control point `index` (0-4). Out of range indices are ignored.
    pub fn set_point(&mut self, index: usize, x: f64, y: f64) {
        if let Some(point) = self.config.points.get_mut(index) {
            point.x = x;
            point.y = y;
        }
    }

    /// Set the Bézier spline description, rebuilding its table if it changed.
    pub fn set_bezier_spline(&mut self, description: impl Into<String>) {
        let description = description.into();
        if description == self.config.bezier_spline {
            return;
        }
        debug!(spline = %description, "Bézier spline changed");
        self.bezier_lut = CurveLut::from_bezier_spline(&description);
        self.config.bezier_spline = description;
    }

    /// The table the next frame will be mapped through.
    pub fn current_lut(&self) -> CurveLut {
        if self.config.uses_bezier() {
            self.bezier_lut.clone()
        } else {
            CurveLut::from_points(&self.config.sorted_points())
        }
    }
}

impl Filter for CurvesFilter {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: "Curves",
            author: "Maksim Golovkin, Till Theato",
            explanation: "Adjust luminance or color channel intensity with curve level mapping",
            major_version: 0,
            minor_version: 1,
            num_params: NUM_PARAMS,
        }
    }

    fn param_info(&self, index: usize) -> Option<ParamInfo> {
        let info = match index {
            PARAM_CHANNEL => ParamInfo::new(
                "Channel",
                ParamKind::Double,
                "Channel to adjust levels (0 = RED; 1 = GREEN; 2 = BLUE; 3 = LUMA)",
            ),
            PARAM_DRAW_CURVES => ParamInfo::new(
                "Show curves",
                ParamKind::Bool,
                "Draw curve graph on output image",
            ),
            PARAM_GRAPH_POSITION => ParamInfo::new(
                "Graph position",
                ParamKind::Double,
                "Output image corner where curve graph will be drawn \
                 (0 = TOP,LEFT; 1 = TOP,RIGHT; 2 = BOTTOM,LEFT; 3 = BOTTOM,RIGHT)",
            ),
            PARAM_POINT_NUMBER => ParamInfo::new(
                "Curve point number",
                ParamKind::Double,
                "Number of points to use to build curve",
            ),
            PARAM_LUMA_FORMULA => ParamInfo::new(
                "Luma formula",
                ParamKind::Bool,
                "Use Rec. 601 (false) or Rec. 709 (true)",
            ),
            PARAM_BEZIER_SPLINE => ParamInfo::new(
                "Bézier spline",
                ParamKind::String,
                "Use cubic Bézier spline. Has to be a sorted list of points in the format \
                 \"handle1x;handle1y#pointx;pointy#handle2x;handle2y\" (pointx = in, pointy = out). \
                 Points are separated by a \"|\". x, y for points should be in the range 0-255; \
                 handles may lie outside it.",
            ),
            i if i < NUM_PARAMS => {
                let offset = i - FIRST_POINT_PARAM;
                let which = if offset % 2 == 0 { "input" } else { "output" };
                let name = format!("Point {} {} value", offset / 2 + 1, which);
                ParamInfo::new(name.clone(), ParamKind::Double, name)
            }
            _ => return None,
        };
        Some(info)
    }

    fn set_param(&mut self, index: usize, value: ParamValue) -> Result<()> {
        match index {
            PARAM_CHANNEL => self.set_channel(Channel::from_param(expect_f64(index, &value)?)),
            PARAM_DRAW_CURVES => self.set_draw_curves(expect_bool(index, &value)?),
            PARAM_GRAPH_POSITION => {
                self.set_graph_position(GraphPosition::from_param(expect_f64(index, &value)?))
            }
            PARAM_POINT_NUMBER => {
                let count = expect_f64(index, &value)?.max(0.0) as usize;
                self.set_point_number(count);
            }
            PARAM_LUMA_FORMULA => {
                self.set_luma_formula(LumaFormula::from_flag(expect_bool(index, &value)?))
            }
            PARAM_BEZIER_SPLINE => match value {
                ParamValue::String(s) => self.set_bezier_spline(s),
                _ => {
                    return Err(FilterError::ParamType {
                        index,
                        expected: ParamKind::String,
                    })
                }
            },
            i if i < NUM_PARAMS => {
                let v = expect_f64(index, &value)?;
                let offset = i - FIRST_POINT_PARAM;
                let point = &mut self.config.points[offset / 2];
                if offset % 2 == 0 {
                    point.x = v;
                } else {
                    point.y = v;
                }
            }
            _ => return Err(FilterError::UnknownParam(index)),
        }
        Ok(())
    }

    fn param(&self, index: usize) -> Result<ParamValue> {
        let c = &self.config;
        let value = match index {
            PARAM_CHANNEL => ParamValue::Double(c.channel.to_param()),
            PARAM_DRAW_CURVES => ParamValue::Bool(c.draw_curves),
            PARAM_GRAPH_POSITION => ParamValue::Double(c.graph_position.to_param()),
            PARAM_POINT_NUMBER => ParamValue::Double(c.point_number as f64),
            PARAM_LUMA_FORMULA => ParamValue::Bool(c.luma_formula.is_rec709()),
            PARAM_BEZIER_SPLINE => ParamValue::String(c.bezier_spline.clone()),
            i if i < NUM_PARAMS => {
                let offset = i - FIRST_POINT_PARAM;
                let point = c.points[offset / 2];
                ParamValue::Double(if offset % 2 == 0 { point.x } else { point.y })
            }
            _ => return Err(FilterError::UnknownParam(index)),
        };
        Ok(value)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn update(&mut self, _time: f64, input: &[u8], output: &mut [u8]) -> Result<()> {
        check_frame_len(self.width, self.height, input)?;
        check_frame_len(self.width, self.height, output)?;
        let c = &self.config;

        if c.uses_bezier() {
            apply_lut(input, output, &self.bezier_lut, c.channel, c.luma_formula);
            return Ok(());
        }

        let points = c.sorted_points();
        let spline = SplineCoefficients::fit(&points);
        let lut = CurveLut::from_spline(&spline);
        trace!(points = points.len(), "Built lookup table from control points");
        apply_lut(input, output, &lut, c.channel, c.luma_formula);

        if c.draw_curves {
            let samples = overlay_samples(&spline, graph_scale(self.height));
            let graph = CurveGraph {
                points: &points,
                samples: &samples,
                channel: c.channel,
                position: c.graph_position,
            };
            draw_curve_graph(output, self.width, self.height, &graph);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CurvePoint;

    const S_CURVE: &str = "0;0#0;0#64;0|64;255#128;255#192;255|192;255#255;255#255;255";

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        rgba.iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect()
    }

    fn run(filter: &mut CurvesFilter, input: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; input.len()];
        filter.update(0.0, input, &mut output).unwrap();
        output
    }

    fn inverting_filter(width: u32, height: u32) -> CurvesFilter {
        let mut filter = CurvesFilter::new(width, height);
        filter.set_draw_curves(false);
        filter.set_point(0, 0.0, 1.0);
        filter.set_point(1, 1.0, 0.0);
        filter
    }

    #[test]
    fn test_default_filter_is_identity_without_graph() {
        let mut filter = CurvesFilter::new(4, 4);
        filter.set_draw_curves(false);
        let input: Vec<u8> = (0..64).map(|i| (i * 4) as u8).collect();
        assert_eq!(run(&mut filter, &input), input);
    }

    #[test]
    fn test_red_channel_only() {
        let mut filter = inverting_filter(2, 2);
        let output = run(&mut filter, &solid(2, 2, [100, 50, 25, 255]));
        assert_eq!(&output[..4], &[155, 50, 25, 255]);
    }

    #[test]
    fn test_points_set_through_params() {
        let mut filter = CurvesFilter::new(2, 2);
        filter.set_param(PARAM_DRAW_CURVES, ParamValue::Bool(false)).unwrap();
        filter.set_param(PARAM_CHANNEL, ParamValue::Double(2.0)).unwrap();
        filter.set_param(FIRST_POINT_PARAM + 1, ParamValue::Double(1.0)).unwrap();
        filter.set_param(FIRST_POINT_PARAM + 3, ParamValue::Double(0.0)).unwrap();
        let output = run(&mut filter, &solid(2, 2, [10, 20, 30, 40]));
        assert_eq!(&output[..4], &[10, 20, 225, 40]);
    }

    #[test]
    fn test_bezier_takes_precedence_over_points() {
        let mut filter = inverting_filter(2, 2);
        filter.set_bezier_spline("0;0#0;0#0;0|255;255#255;255#255;255");
        let input = solid(2, 2, [100, 50, 25, 255]);
        let output = run(&mut filter, &input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_clearing_bezier_restores_points() {
        let mut filter = inverting_filter(2, 2);
        filter.set_bezier_spline(S_CURVE);
        filter.set_bezier_spline("");
        let output = run(&mut filter, &solid(2, 2, [100, 50, 25, 255]));
        assert_eq!(output[0], 155);
    }

    #[test]
    fn test_bezier_table_is_cached() {
        let mut filter = CurvesFilter::new(2, 2);
        filter.set_bezier_spline(S_CURVE);
        let lut = filter.current_lut();
        // Changing points has no effect while the spline is active.
        filter.set_point(0, 0.0, 1.0);
        assert_eq!(filter.current_lut(), lut);
        assert_eq!(lut.map[200], 255);
    }

    #[test]
    fn test_bezier_never_draws_graph() {
        let mut filter = CurvesFilter::new(64, 64);
        filter.set_draw_curves(true);
        filter.set_bezier_spline("0;0#0;0#0;0|255;255#255;255#255;255");
        let input = solid(64, 64, [0, 0, 0, 255]);
        assert_eq!(run(&mut filter, &input), input);
    }

    #[test]
    fn test_graph_drawn_in_point_mode() {
        let mut filter = CurvesFilter::new(64, 64);
        let input = solid(64, 64, [0, 0, 0, 255]);
        let output = run(&mut filter, &input);
        assert_ne!(output, input);
        // Top-left corner stays untouched with the graph bottom-right.
        assert_eq!(&output[..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_luma_mode() {
        let mut filter = CurvesFilter::new(2, 1);
        filter.set_draw_curves(false);
        filter.set_channel(Channel::Luma);
        filter.set_point(1, 1.0, 0.5);
        let output = run(&mut filter, &solid(2, 1, [200, 100, 50, 9]));
        assert_eq!(&output[..4], &[100, 50, 25, 9]);
    }

    #[test]
    fn test_five_points() {
        let mut filter = CurvesFilter::new(2, 1);
        filter.set_draw_curves(false);
        filter.set_point_number(5);
        let points = [(0.0, 0.0), (0.25, 0.15), (0.5, 0.5), (0.75, 0.85), (1.0, 1.0)];
        for (i, &(x, y)) in points.iter().enumerate() {
            filter.set_point(i, x, y);
        }
        let lut = filter.current_lut();
        assert_eq!(lut.map[0], 0);
        assert_eq!(lut.map[255], 255);
        assert!(lut.map[64] < 64);
        assert!(lut.map[192] > 192);
    }

    #[test]
    fn test_wrong_buffer_size() {
        let mut filter = CurvesFilter::new(2, 2);
        let mut output = vec![0u8; 16];
        assert_eq!(
            filter.update(0.0, &[0u8; 15], &mut output),
            Err(FilterError::BufferSize {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_param_round_trip() {
        let mut filter = CurvesFilter::new(2, 2);
        filter.set_param(PARAM_GRAPH_POSITION, ParamValue::Double(1.0)).unwrap();
        filter.set_param(PARAM_LUMA_FORMULA, ParamValue::Double(0.0)).unwrap();
        filter.set_param(PARAM_POINT_NUMBER, ParamValue::Double(4.0)).unwrap();
        filter
            .set_param(PARAM_BEZIER_SPLINE, ParamValue::String(S_CURVE.into()))
            .unwrap();
        filter.set_param(FIRST_POINT_PARAM + 8, ParamValue::Double(0.4)).unwrap();

        assert_eq!(filter.param(PARAM_GRAPH_POSITION), Ok(ParamValue::Double(1.0)));
        assert_eq!(filter.param(PARAM_LUMA_FORMULA), Ok(ParamValue::Bool(false)));
        assert_eq!(filter.param(PARAM_POINT_NUMBER), Ok(ParamValue::Double(4.0)));
        assert_eq!(
            filter.param(PARAM_BEZIER_SPLINE),
            Ok(ParamValue::String(S_CURVE.into()))
        );
        assert_eq!(filter.config().points[4], CurvePoint::new(0.4, 0.0));
        assert_eq!(filter.param(FIRST_POINT_PARAM + 8), Ok(ParamValue::Double(0.4)));
    }

    #[test]
    fn test_param_errors() {
        let mut filter = CurvesFilter::new(2, 2);
        assert_eq!(
            filter.set_param(16, ParamValue::Double(0.0)),
            Err(FilterError::UnknownParam(16))
        );
        assert_eq!(
            filter.set_param(PARAM_BEZIER_SPLINE, ParamValue::Double(1.0)),
            Err(FilterError::ParamType {
                index: PARAM_BEZIER_SPLINE,
                expected: ParamKind::String
            })
        );
        assert!(filter
            .set_param(PARAM_CHANNEL, ParamValue::String("red".into()))
            .is_err());
        assert_eq!(filter.param(99), Err(FilterError::UnknownParam(99)));
    }

    #[test]
    fn test_param_info_table() {
        let filter = CurvesFilter::new(2, 2);
        assert_eq!(filter.info().num_params, 16);
        assert_eq!(filter.param_info(5).unwrap().kind, ParamKind::String);
        assert_eq!(filter.param_info(6).unwrap().name, "Point 1 input value");
        assert_eq!(filter.param_info(15).unwrap().name, "Point 5 output value");
        assert!(filter.param_info(16).is_none());
    }

    #[test]
    fn test_apply_config_rebuilds_spline_table() {
        let mut filter = CurvesFilter::new(2, 2);
        let mut config = CurvesConfig::new();
        config.bezier_spline = S_CURVE.to_string();
        config.channel = Channel::Green;
        filter.apply_config(config.clone());
        assert_eq!(filter.config(), &config);
        assert_eq!(filter.current_lut().map[200], 255);
    }

    #[test]
    fn test_config_point_number_is_clamped() {
        let mut config = CurvesConfig::new();
        config.point_number = 9;
        let mut filter = CurvesFilter::new(2, 2);
        filter.apply_config(config.clone());
        assert_eq!(filter.param(PARAM_POINT_NUMBER), Ok(ParamValue::Double(5.0)));

        config.point_number = 0;
        let filter = CurvesFilter::with_config(2, 2, config);
        assert_eq!(filter.param(PARAM_POINT_NUMBER), Ok(ParamValue::Double(2.0)));
    }

    #[test]
    fn test_with_config_builds_spline_table() {
        let mut config = CurvesConfig::new();
        config.bezier_spline = S_CURVE.to_string();
        let filter = CurvesFilter::with_config(2, 2, config);
        assert_eq!(filter.current_lut().map[200], 255);
    }

    #[test]
    fn test_process_image() {
        let mut filter = inverting_filter(3, 2);
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([0, 10, 20, 30]));
        let output = filter.process_image(0.0, &image).unwrap();
        assert_eq!(output.get_pixel(2, 1).0, [255, 10, 20, 30]);
    }

    #[test]
    fn test_process_image_wrong_size() {
        let mut filter = CurvesFilter::new(3, 2);
        let image = RgbaImage::new(2, 3);
        assert!(matches!(
            filter.process_image(0.0, &image),
            Err(FilterError::Dimensions { .. })
        ));
    }
}
