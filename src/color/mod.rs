//! Perceptual color space conversion and sample distance metrics

/// CIE L*a*b* color representation and sRGB conversion
pub mod lab;
/// Distance policies for comparing color samples
pub mod metric;

pub use lab::{CieLab, rgba_to_lab};
pub use metric::{lab_distance, redmean_distance};
