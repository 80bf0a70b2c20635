//! Error types for filter operations.
//!
//! Curve content never produces an error: malformed spline groups, unsorted
//! segments and singular fits degrade the picture instead. Only calls that
//! would otherwise index outside a buffer or a parameter table are rejected.

use crate::filter::ParamKind;
use thiserror::Error;

/// Error types for filter operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A source or destination frame buffer has the wrong length.
    #[error("Frame buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// An image does not match the dimensions the filter was built for.
    #[error("Image is {actual_width}x{actual_height}, filter expects {width}x{height}")]
    Dimensions {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The frame size in bytes does not fit in `usize`.
    #[error("Frame of {width}x{height} pixels is too large")]
    FrameTooLarge { width: u32, height: u32 },

    /// The parameter index is outside the filter's parameter table.
    #[error("Unknown parameter index: {0}")]
    UnknownParam(usize),

    /// The value kind does not match the parameter's declared kind.
    #[error("Parameter {index} expects a {expected} value")]
    ParamType { index: usize, expected: ParamKind },
}

/// Result type for filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Check that a frame buffer holds exactly `width * height` RGBA pixels.
pub(crate) fn check_frame_len(width: u32, height: u32, buffer: &[u8]) -> Result<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .ok_or(FilterError::FrameTooLarge { width, height })?;
    if buffer.len() != expected {
        return Err(FilterError::BufferSize {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}
