//! RGB to packed YUYV (YUV 4:2:2) conversion for V4L2 output devices.
//!
//! BT.601 limited range, integer arithmetic. Each pair of horizontal
//! pixels shares one U and one V sample: `Y0 U Y1 V`.

use crate::error::{MediaError, Result};

/// Converts a row-major RGB buffer to YUYV into `out` (resized to fit).
///
/// `width` must be even.
pub fn rgb_to_yuyv(rgb: &[u8], width: u32, height: u32, out: &mut Vec<u8>) -> Result<()> {
    if width % 2 != 0 {
        return Err(MediaError::Config(format!(
            "YUYV needs an even width, got {}",
            width
        )));
    }
    let pixels = width as usize * height as usize;
    if rgb.len() != pixels * 3 {
        return Err(MediaError::Processing(format!(
            "RGB buffer holds {} bytes, expected {}",
            rgb.len(),
            pixels * 3
        )));
    }

    out.clear();
    out.reserve(pixels * 2);

    for pair in rgb.chunks_exact(6) {
        let (r0, g0, b0) = (i32::from(pair[0]), i32::from(pair[1]), i32::from(pair[2]));
        let (r1, g1, b1) = (i32::from(pair[3]), i32::from(pair[4]), i32::from(pair[5]));

        let (r, g, b) = ((r0 + r1) / 2, (g0 + g1) / 2, (b0 + b1) / 2);

        out.push(luma(r0, g0, b0));
        out.push(clamp(((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128));
        out.push(luma(r1, g1, b1));
        out.push(clamp(((112 * r - 94 * g - 18 * b + 128) >> 8) + 128));
    }

    Ok(())
}

fn luma(r: i32, g: i32, b: i32) -> u8 {
    clamp(((66 * r + 129 * g + 25 * b + 128) >> 8) + 16)
}

fn clamp(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
