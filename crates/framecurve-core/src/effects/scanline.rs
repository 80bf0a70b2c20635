//! Interlaced black lines.

use crate::error::{check_frame_len, FilterError, Result};
use crate::filter::{Filter, ParamInfo, ParamValue, PluginInfo};

/// Every fourth row of the input is kept.
const LINE_PERIOD: usize = 4;

/// Keeps rows whose index is a multiple of four and clears the rest to
/// transparent black.
#[derive(Debug, Clone, Copy)]
pub struct ScanlineFilter {
    width: u32,
    height: u32,
}

impl ScanlineFilter {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Filter for ScanlineFilter {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: "scanline0r",
            author: "Martin Bayer",
            explanation: "interlaced black lines",
            major_version: 0,
            minor_version: 1,
            num_params: 0,
        }
    }

    fn param_info(&self, _index: usize) -> Option<ParamInfo> {
        None
    }

    fn set_param(&mut self, index: usize, _value: ParamValue) -> Result<()> {
        Err(FilterError::UnknownParam(index))
    }

    fn param(&self, index: usize) -> Result<ParamValue> {
        Err(FilterError::UnknownParam(index))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn update(&mut self, _time: f64, input: &[u8], output: &mut [u8]) -> Result<()> {
        check_frame_len(self.width, self.height, input)?;
        check_frame_len(self.width, self.height, output)?;

        let row_bytes = self.width as usize * 4;
        if row_bytes == 0 {
            return Ok(());
        }
        for (row, (src, dst)) in input
            .chunks_exact(row_bytes)
            .zip(output.chunks_exact_mut(row_bytes))
            .enumerate()
        {
            if row % LINE_PERIOD == 0 {
                dst.copy_from_slice(src);
            } else {
                dst.fill(0);
            }
        }
        Ok(())
    }
}
