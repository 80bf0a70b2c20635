//! Frame effect WASM bindings.

use crate::to_js_error;
use framecurve_core::{DelayFilter, Filter, FilterError, ScanlineFilter};
use wasm_bindgen::prelude::*;

fn run<F: Filter>(filter: &mut F, pixels: &[u8], time: f64) -> Result<Vec<u8>, FilterError> {
    let mut output = vec![0u8; pixels.len()];
    filter.update(time, pixels, &mut output)?;
    Ok(output)
}

/// JavaScript-accessible video delay.
#[wasm_bindgen]
pub struct JsDelayFilter {
    inner: DelayFilter,
}

#[wasm_bindgen]
impl JsDelayFilter {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> JsDelayFilter {
        JsDelayFilter {
            inner: DelayFilter::new(width, height),
        }
    }

    /// Delay in seconds
    #[wasm_bindgen(getter)]
    pub fn delay(&self) -> f64 {
        self.inner.delay()
    }

    #[wasm_bindgen(setter)]
    pub fn set_delay(&mut self, seconds: f64) {
        self.inner.set_delay(seconds);
    }

    /// Push a frame stamped `time` seconds and get the delayed one back.
    pub fn process(&mut self, pixels: &[u8], time: f64) -> Result<Vec<u8>, JsValue> {
        run(&mut self.inner, pixels, time).map_err(to_js_error)
    }
}

/// JavaScript-accessible scanline blanker.
#[wasm_bindgen]
pub struct JsScanlineFilter {
    inner: ScanlineFilter,
}

#[wasm_bindgen]
impl JsScanlineFilter {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> JsScanlineFilter {
        JsScanlineFilter {
            inner: ScanlineFilter::new(width, height),
        }
    }

    pub fn process(&mut self, pixels: &[u8]) -> Result<Vec<u8>, JsValue> {
        run(&mut self.inner, pixels, 0.0).map_err(to_js_error)
    }
}
