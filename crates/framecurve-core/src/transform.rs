//! Apply a curve LUT to a packed RGBA8888 frame.

use crate::luminance::LumaFormula;
use crate::lut::CurveLut;
use crate::Channel;

/// Map `src` into `dst` through `lut`.
///
/// For a color channel only that byte is remapped. For luma, the pixel's luma
/// selects a ratio from `lut.luma_ratio` that scales red, green and blue
/// alike. Alpha is always copied. Both buffers hold RGBA pixels; extra bytes
/// past the shorter buffer's last whole pixel are left alone.
///
/// # Arguments
/// * `src` - Source RGBA pixels (4 bytes per pixel, row-major order)
/// * `dst` - Destination RGBA pixels, same layout
/// * `lut` - Pre-computed lookup table
/// * `channel` - Which channel the curve applies to
/// * `formula` - Luma weights, only used for [`Channel::Luma`]
pub fn apply_lut(
    src: &[u8],
    dst: &mut [u8],
    lut: &CurveLut,
    channel: Channel,
    formula: LumaFormula,
) {
    let pixels = src.chunks_exact(4).zip(dst.chunks_exact_mut(4));

    match channel.byte_index() {
        Some(idx) => {
            for (s, d) in pixels {
                d.copy_from_slice(s);
                d[idx] = lut.map[s[idx] as usize];
            }
        }
        None => {
            for (s, d) in pixels {
                let luma = formula.luma_u8(s[0], s[1], s[2]);
                if luma == 0 {
                    // Black maps straight to the ratio table's first entry.
                    let v = lut.luma_ratio[0].clamp(0.0, 255.0) as u8;
                    d[0] = v;
                    d[1] = v;
                    d[2] = v;
                } else {
                    let ratio = lut.luma_ratio[luma as usize];
                    d[0] = scale_channel(s[0], ratio);
                    d[1] = scale_channel(s[1], ratio);
                    d[2] = scale_channel(s[2], ratio);
                }
                d[3] = s[3];
            }
        }
    }
}

#[inline]
fn scale_channel(value: u8, ratio: f64) -> u8 {
    (value as f64 * ratio).round().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Tests
// ============================================================================
