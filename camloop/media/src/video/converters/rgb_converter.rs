//! BGR to RGB conversion
//!
//! OpenCV captures BGR; frames in the loop are RGB.

use crate::error::{MediaError, Result};
use crate::video::frame::Frame;
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::{MatTraitConst, MatTraitConstManual};

/// Converts a captured BGR `Mat` into an RGB [`Frame`] of `width x height`.
///
/// The image is resized first when the device delivered another size, so
/// every frame reaching the loop has the session's dimensions.
pub fn mat_to_frame(mat: &Mat, width: u32, height: u32) -> Result<Frame> {
    if mat.empty() {
        return Err(MediaError::Processing("Empty frame".to_string()));
    }
    if mat.channels() != 3 {
        return Err(MediaError::Processing(format!(
            "Expected 3-channel BGR frame, got {} channel(s)",
            mat.channels()
        )));
    }

    let resized;
    let source = if mat.cols() as u32 != width || mat.rows() as u32 != height {
        let mut dst = Mat::default();
        imgproc::resize(
            mat,
            &mut dst,
            Size::new(width as i32, height as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;
        resized = dst;
        &resized
    } else {
        mat
    };

    let bgr = source
        .data_bytes()
        .map_err(|e| MediaError::Processing(format!("Failed to get frame data: {}", e)))?;

    Frame::new(width, height, bgr_to_rgb(bgr))
}

/// Swaps the blue and red channel of every packed pixel.
///
/// Trailing bytes that do not form a whole pixel are dropped.
pub fn bgr_to_rgb(bgr: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bgr.len() - bgr.len() % 3);
    for px in bgr.chunks_exact(3) {
        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
    }
    rgb
}
