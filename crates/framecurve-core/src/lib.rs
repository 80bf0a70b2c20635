//! Framecurve Core - tone curve filters for RGBA video frames
//!
//! This crate builds 256-entry lookup tables from a handful of control points
//! (linear, quadratic or natural cubic spline fits) or from a cubic Bézier
//! spline description, applies them to packed RGBA8888 frames per channel or
//! on luma, and can draw the fitted curve as an overlay on the output.
//!
//! Two small frame effects (a frame delay and a scanline blanker) share the
//! same [`Filter`] contract.

pub mod bezier;
pub mod config;
pub mod effects;
pub mod error;
pub mod filter;
pub mod graph;
pub mod luminance;
pub mod lut;
pub mod solver;
pub mod spline;
pub mod transform;

pub use config::CurvesConfig;
pub use effects::{DelayFilter, ScanlineFilter};
pub use error::{FilterError, Result};
pub use filter::{CurvesFilter, Filter, ParamInfo, ParamKind, ParamValue, PluginInfo};
pub use luminance::LumaFormula;
pub use lut::CurveLut;
pub use spline::SplineCoefficients;
pub use transform::apply_lut;

/// Maximum number of control points a curves filter exposes.
pub const MAX_POINTS: usize = 5;

/// Tone curve control point
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePoint {
    /// Input value (0.0 to 1.0)
    pub x: f64,
    /// Output value (0.0 to 1.0)
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Color channel the curve is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
    /// Scale all three channels by the curve's output/input ratio of the luma.
    Luma,
}

impl Channel {
    /// Convert from the host's real-valued encoding (0 = red .. 3 = luma).
    ///
    /// The value is truncated; anything below 1 selects red and anything
    /// at or above 3 selects luma.
    pub fn from_param(value: f64) -> Self {
        match value as i64 {
            1 => Channel::Green,
            2 => Channel::Blue,
            n if n >= 3 => Channel::Luma,
            _ => Channel::Red,
        }
    }

    pub fn to_param(self) -> f64 {
        match self {
            Channel::Red => 0.0,
            Channel::Green => 1.0,
            Channel::Blue => 2.0,
            Channel::Luma => 3.0,
        }
    }

    /// Byte offset of the channel inside an RGBA pixel, `None` for luma.
    pub fn byte_index(self) -> Option<usize> {
        match self {
            Channel::Red => Some(0),
            Channel::Green => Some(1),
            Channel::Blue => Some(2),
            Channel::Luma => None,
        }
    }
}

/// Frame corner the curve graph is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl GraphPosition {
    /// Convert from the host's real-valued encoding (0 = top-left .. 3 = bottom-right).
    pub fn from_param(value: f64) -> Self {
        match value as i64 {
            1 => GraphPosition::TopRight,
            2 => GraphPosition::BottomLeft,
            n if n >= 3 => GraphPosition::BottomRight,
            _ => GraphPosition::TopLeft,
        }
    }

    pub fn to_param(self) -> f64 {
        match self {
            GraphPosition::TopLeft => 0.0,
            GraphPosition::TopRight => 1.0,
            GraphPosition::BottomLeft => 2.0,
            GraphPosition::BottomRight => 3.0,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, GraphPosition::TopLeft | GraphPosition::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, GraphPosition::TopLeft | GraphPosition::TopRight)
    }
}
