//! Framecurve WASM - WebAssembly bindings for Framecurve
//!
//! This crate exposes the framecurve-core filters to JavaScript/TypeScript so a
//! browser can run them on canvas `ImageData` frames.
//!
//! # Module Structure
//!
//! - `curves` - The tone curve filter with per-parameter setters and JSON config
//! - `effects` - Frame delay and scanline filters
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCurvesFilter } from '@framecurve/wasm';
//!
//! await init();
//!
//! const filter = new JsCurvesFilter(canvas.width, canvas.height);
//! filter.channel = 3; // luma
//! const frame = ctx.getImageData(0, 0, canvas.width, canvas.height);
//! frame.data.set(filter.process(frame.data));
//! ```

use wasm_bindgen::prelude::*;

mod curves;
mod effects;

pub use curves::{curves_param_names, JsCurvesFilter};
pub use effects::{JsDelayFilter, JsScanlineFilter};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert a core error into a JavaScript error string.
pub(crate) fn to_js_error(err: framecurve_core::FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
