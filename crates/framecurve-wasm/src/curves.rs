//! Curves filter WASM bindings.
//!
//! Wraps the core `CurvesFilter` so the web UI can set parameters one at a
//! time or as a whole config object, and map RGBA frames through it.

use crate::to_js_error;
use framecurve_core::{
    Channel, CurvesConfig, CurvesFilter, Filter, GraphPosition, LumaFormula,
};
use wasm_bindgen::prelude::*;

/// JavaScript-accessible curves filter.
///
/// # Example (TypeScript)
/// ```typescript
/// const filter = new JsCurvesFilter(640, 480);
/// filter.point_number = 3;
/// filter.set_point(2, 0.5, 0.7);
/// const out = filter.process(rgbaPixels);
///
/// // Or drive the curve with a Bézier spline description
/// filter.bezier_spline = "0;0#0;0#64;0|192;255#255;255#255;255";
/// ```
#[wasm_bindgen]
pub struct JsCurvesFilter {
    inner: CurvesFilter,
}

#[wasm_bindgen]
impl JsCurvesFilter {
    /// Create a filter for frames of `width x height` pixels.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> JsCurvesFilter {
        JsCurvesFilter {
            inner: CurvesFilter::new(width, height),
        }
    }

    /// Channel as a number (0 = red, 1 = green, 2 = blue, 3 = luma)
    #[wasm_bindgen(getter)]
    pub fn channel(&self) -> f64 {
        self.inner.config().channel.to_param()
    }

    #[wasm_bindgen(setter)]
    pub fn set_channel(&mut self, value: f64) {
        self.inner.set_channel(Channel::from_param(value));
    }

    /// Whether the curve graph is drawn
    #[wasm_bindgen(getter)]
    pub fn draw_curves(&self) -> bool {
        self.inner.config().draw_curves
    }

    #[wasm_bindgen(setter)]
    pub fn set_draw_curves(&mut self, value: bool) {
        self.inner.set_draw_curves(value);
    }

    /// Graph corner (0 = top-left, 1 = top-right, 2 = bottom-left, 3 = bottom-right)
    #[wasm_bindgen(getter)]
    pub fn graph_position(&self) -> f64 {
        self.inner.config().graph_position.to_param()
    }

    #[wasm_bindgen(setter)]
    pub fn set_graph_position(&mut self, value: f64) {
        self.inner.set_graph_position(GraphPosition::from_param(value));
    }

    /// Number of active control points (2 to 5)
    #[wasm_bindgen(getter)]
    pub fn point_number(&self) -> u32 {
        self.inner.config().point_number as u32
    }

    #[wasm_bindgen(setter)]
    pub fn set_point_number(&mut self, value: u32) {
        self.inner.set_point_number(value as usize);
    }

    /// Luma formula: false = Rec. 601, true = Rec. 709
    #[wasm_bindgen(getter)]
    pub fn rec709(&self) -> bool {
        self.inner.config().luma_formula.is_rec709()
    }

    #[wasm_bindgen(setter)]
    pub fn set_rec709(&mut self, value: bool) {
        self.inner.set_luma_formula(LumaFormula::from_flag(value));
    }

    /// Bézier spline description; empty string switches back to control points
    #[wasm_bindgen(getter)]
    pub fn bezier_spline(&self) -> String {
        self.inner.config().bezier_spline.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_bezier_spline(&mut self, value: String) {
        self.inner.set_bezier_spline(value);
    }

    /// Set control point `index` (0-4) to `(x, y)` in the unit square.
    pub fn set_point(&mut self, index: usize, x: f64, y: f64) {
        self.inner.set_point(index, x, y);
    }

    /// Control point `index` as `[x, y]`, empty past the last slot.
    pub fn point(&self, index: usize) -> Vec<f64> {
        self.inner
            .config()
            .points
            .get(index)
            .map(|p| vec![p.x, p.y])
            .unwrap_or_default()
    }

    /// Replace all parameters from a config object.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns error if the object cannot be deserialized
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: CurvesConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid curves config: {}", e)))?;
        self.inner.apply_config(config);
        Ok(())
    }

    /// All parameters as a config object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize config: {}", e)))
    }

    /// Map one RGBA frame and return the result.
    ///
    /// # Errors
    /// Returns error if `pixels` is not `width * height * 4` bytes
    pub fn process(&mut self, pixels: &[u8], time: f64) -> Result<Vec<u8>, JsValue> {
        self.process_frame(pixels, time).map_err(to_js_error)
    }

    /// Intensity map of the table the next frame will use (256 bytes).
    pub fn lut(&self) -> Vec<u8> {
        self.inner.current_lut().map.to_vec()
    }

    /// Luma ratios of the table the next frame will use (256 values).
    pub fn luma_ratios(&self) -> Vec<f64> {
        self.inner.current_lut().luma_ratio.to_vec()
    }
}

impl JsCurvesFilter {
    fn process_frame(
        &mut self,
        pixels: &[u8],
        time: f64,
    ) -> Result<Vec<u8>, framecurve_core::FilterError> {
        let mut output = vec![0u8; pixels.len()];
        self.inner.update(time, pixels, &mut output)?;
        Ok(output)
    }
}

/// Names of the curves filter parameters, in index order.
#[wasm_bindgen]
pub fn curves_param_names() -> js_sys::Array {
    param_names()
        .into_iter()
        .map(|name| JsValue::from_str(&name))
        .collect()
}

fn param_names() -> Vec<String> {
    let filter = CurvesFilter::new(0, 0);
    (0..filter.info().num_params)
        .filter_map(|i| filter.param_info(i))
        .map(|info| info.name)
        .collect()
}
