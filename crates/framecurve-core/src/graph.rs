//! Curve graph overlay drawn into a corner of the output frame.
//!
//! The graph is a square of `height / 2` pixels. It lightens a grid
//! background, marks every control point and then draws the fitted curve,
//! all directly into the already mapped RGBA frame. Graph y grows upward,
//! so graph row `y` lands on frame row `max_y - y + y_offset`.

use crate::{Channel, CurvePoint, GraphPosition};
use tracing::debug;

/// Everything needed to draw one graph.
#[derive(Debug, Clone, Copy)]
pub struct CurveGraph<'a> {
    /// Sorted control points in the unit square.
    pub points: &'a [CurvePoint],
    /// Curve height per graph column, in pixels (see [`crate::lut::overlay_samples`]).
    pub samples: &'a [f32],
    pub channel: Channel,
    pub position: GraphPosition,
}

/// Graph side length for a frame of the given height.
pub fn graph_scale(height: u32) -> usize {
    (height / 2) as usize
}

/// Drawing target: a frame plus the graph square's placement inside it.
struct Canvas<'a> {
    frame: &'a mut [u8],
    stride: usize,
    scale: usize,
    x_offset: usize,
    y_offset: usize,
    color: [u8; 3],
}

impl Canvas<'_> {
    /// Byte offset of graph coordinate `(x, y)`; both must be inside the square.
    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        let row = self.scale - 1 - y + self.y_offset;
        (row * self.stride + x + self.x_offset) * 4
    }

    #[inline]
    fn plot(&mut self, x: usize, y: usize) {
        let offset = self.offset(x, y);
        if let Some(px) = self.frame.get_mut(offset..offset + 3) {
            px.copy_from_slice(&self.color);
        }
    }

    #[inline]
    fn lighten(&mut self, x: usize, y: usize) {
        let offset = self.offset(x, y);
        if let Some(px) = self.frame.get_mut(offset..offset + 3) {
            for v in px {
                *v = (*v >> 1) + 0x7F;
            }
        }
    }

    /// Plot every row from `lo` to `hi` in column `x`, clamping rows into the square.
    fn vertical_run(&mut self, x: usize, lo: i64, hi: i64) {
        if lo > hi {
            return;
        }
        let max = self.scale as i64 - 1;
        for y in lo.clamp(0, max)..=hi.clamp(0, max) {
            self.plot(x, y as usize);
        }
    }
}

/// Draw the curve graph into `frame`.
///
/// # Arguments
/// * `frame` - Output RGBA pixels (4 bytes per pixel, row-major order)
/// * `width` - Frame width in pixels
/// * `height` - Frame height in pixels
/// * `graph` - Points, curve samples, accent channel and corner
pub fn draw_curve_graph(frame: &mut [u8], width: u32, height: u32, graph: &CurveGraph<'_>) {
    let scale = graph_scale(height);
    let width = width as usize;
    if scale == 0 || scale > width {
        debug!(width, height, "Frame too small for curve graph");
        return;
    }

    let mut color = [0u8; 3];
    if let Some(idx) = graph.channel.byte_index() {
        color[idx] = 255;
    }

    let mut canvas = Canvas {
        frame,
        stride: width,
        scale,
        x_offset: if graph.position.is_left() { 0 } else { width - scale },
        y_offset: if graph.position.is_top() { 0 } else { height as usize - scale },
        color,
    };

    let line_width = scale as f32 / 254.0;
    draw_grid(&mut canvas, line_width);
    draw_points(&mut canvas, graph.points, line_width);
    draw_curve(&mut canvas, graph.samples, line_width);
}

/// Lighten everything except the grid lines.
fn draw_grid(canvas: &mut Canvas<'_>, line_width: f32) {
    let cell_size = (line_width * 32.0).floor() as usize;
    if cell_size == 0 {
        return;
    }
    let off_grid = |i: usize| (i % cell_size) as f32 > line_width;

    for y in (0..canvas.scale).filter(|&y| off_grid(y)) {
        for x in (0..canvas.scale).filter(|&x| off_grid(x)) {
            canvas.lighten(x, y);
        }
    }
}

/// Square markers around each control point.
fn draw_points(canvas: &mut Canvas<'_>, points: &[CurvePoint], line_width: f32) {
    let max_y = (canvas.scale - 1) as f64;
    let reach = 4.0 * line_width;
    let scale = canvas.scale as i64;

    for point in points {
        let px = (point.x * max_y) as i64;
        let py = (point.y * max_y) as i64;
        let x_start = (px as f32 - reach).floor() as i64;
        let x_end = (px as f32 + reach).floor() as i64;
        let y_start = (py as f32 - reach).floor() as i64;
        let y_end = (py as f32 + reach).floor() as i64;

        for x in x_start.max(0)..=x_end.min(scale - 1) {
            for y in y_start.max(0)..=y_end.min(scale - 1) {
                canvas.plot(x as usize, y as usize);
            }
        }
    }
}

/// Connect the per-column samples into a line of roughly `line_width`.
///
/// A jump between columns is split at its midpoint: the first half is drawn
/// in the previous column and the second half in the current one.
fn draw_curve(canvas: &mut Canvas<'_>, samples: &[f32], line_width: f32) {
    let half = line_width * 0.5;
    let mut prev = 0.0f32;

    for (x, &y) in samples.iter().enumerate().take(canvas.scale) {
        if !y.is_finite() {
            continue;
        }

        if x == 0 || y == prev {
            let lo = (y - half).floor() as i64;
            let hi = (y + half).ceil() as i64;
            canvas.vertical_run(x, lo, hi);
        } else {
            let rising = y > prev;
            let gap = if rising { half } else { -half };
            let mid = (y - prev) * 0.5 + prev;

            // Previous sample to the midpoint, in the previous column.
            let start = (prev - gap).round() as i64;
            let (lo, hi) = half_open_run(start, mid + gap, rising);
            canvas.vertical_run(x - 1, lo, hi);

            // Midpoint to this sample, in this column.
            let start = (mid - gap).round() as i64;
            let (lo, hi) = half_open_run(start, (y + gap).ceil(), rising);
            canvas.vertical_run(x, lo, hi);
        }
        prev = y;
    }
}

/// Inclusive integer bounds of the walk from `start` toward `limit`,
/// stopping before `limit` is reached.
fn half_open_run(start: i64, limit: f32, rising: bool) -> (i64, i64) {
    if rising {
        (start, limit.ceil() as i64 - 1)
    } else {
        (limit.floor() as i64 + 1, start)
    }
}

// ============================================================================
// Tests
// ============================================================================
