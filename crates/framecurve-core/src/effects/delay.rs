//! Video delay: replays input frames `delay` seconds late.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{check_frame_len, FilterError, Result};
use crate::filter::{expect_f64, Filter, ParamInfo, ParamKind, ParamValue, PluginInfo};

const PARAM_DELAY: usize = 0;

/// Buffers timestamped frames and outputs the oldest one still inside the
/// delay window.
///
/// Until the window has filled, the output is the first frame seen.
#[derive(Debug, Clone)]
pub struct DelayFilter {
    width: u32,
    height: u32,
    /// Delay in seconds
    delay: f64,
    buffer: VecDeque<(f64, Vec<u8>)>,
}

impl DelayFilter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            delay: 0.0,
            buffer: VecDeque::new(),
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn set_delay(&mut self, seconds: f64) {
        self.delay = seconds;
    }

    /// Number of frames currently held.
    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }
}

impl Filter for DelayFilter {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: "delay0r",
            author: "Martin Bayer",
            explanation: "video delay",
            major_version: 0,
            minor_version: 1,
            num_params: 1,
        }
    }

    fn param_info(&self, index: usize) -> Option<ParamInfo> {
        (index == PARAM_DELAY).then(|| ParamInfo {
            name: "DelayTime".to_string(),
            kind: ParamKind::Double,
            explanation: "the delay time".to_string(),
        })
    }

    fn set_param(&mut self, index: usize, value: ParamValue) -> Result<()> {
        match index {
            PARAM_DELAY => {
                self.set_delay(expect_f64(index, &value)?);
                Ok(())
            }
            _ => Err(FilterError::UnknownParam(index)),
        }
    }

    fn param(&self, index: usize) -> Result<ParamValue> {
        match index {
            PARAM_DELAY => Ok(ParamValue::Double(self.delay)),
            _ => Err(FilterError::UnknownParam(index)),
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn update(&mut self, time: f64, input: &[u8], output: &mut [u8]) -> Result<()> {
        check_frame_len(self.width, self.height, input)?;
        check_frame_len(self.width, self.height, output)?;

        // Drop frames that fell out of the window, keeping one allocation.
        let cutoff = time - self.delay;
        let mut reusable = None;
        let mut kept = VecDeque::with_capacity(self.buffer.len() + 1);
        for (stamp, frame) in self.buffer.drain(..) {
            if stamp < cutoff {
                if reusable.is_none() {
                    reusable = Some(frame);
                }
            } else {
                kept.push_back((stamp, frame));
            }
        }
        self.buffer = kept;

        let mut frame = reusable.unwrap_or_else(|| vec![0; input.len()]);
        frame.copy_from_slice(input);
        self.buffer.push_back((time, frame));
        trace!(time, frames = self.buffer.len(), "Buffered frame");

        if let Some((_, oldest)) = self.buffer.iter().min_by(|a, b| a.0.total_cmp(&b.0)) {
            output.copy_from_slice(oldest);
        }
        Ok(())
    }
}
