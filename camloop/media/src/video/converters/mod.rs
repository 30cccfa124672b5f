//! Pixel format conversion between devices and [`Frame`](super::Frame).

pub mod rgb_converter;
pub mod yuyv_converter;

pub use rgb_converter::{bgr_to_rgb, mat_to_frame};
pub use yuyv_converter::rgb_to_yuyv;
