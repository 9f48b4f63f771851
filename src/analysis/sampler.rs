//! Multi-resolution color signature extraction
//!
//! Each candidate image is reduced to a fixed sequence of
//! nearest-neighbor downsamples: a 1x1 average color, then one sample
//! per integer multiple of the reduced aspect ratio. The raw samples
//! feed raw-space comparison; their precomputed L*a*b* vectors feed
//! perceptual-space comparison. This is a pure transform with no side
//! effects beyond the returned value.

use crate::color::rgba_to_lab;
use crate::io::configuration::MAX_ASPECT_AREA;
use crate::spatial::AspectRatio;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::collections::HashMap;

/// Analysis output for one candidate image
#[derive(Debug, Clone)]
pub struct ImageSamples {
    /// Reduced aspect ratio of the source decode
    pub aspect_ratio: AspectRatio,
    /// Raw downsamples, index i at resolution `aspect_ratio.size_at(i)`
    pub samples: Vec<RgbaImage>,
    /// Packed L*a*b* vectors keyed by sample resolution
    pub lab_samples: HashMap<(u32, u32), Vec<f64>>,
}

impl ImageSamples {
    /// Whether analysis produced no samples (filtered candidate)
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Derive the fixed sample sequence for a decoded image
///
/// Images whose reduced aspect-ratio area exceeds
/// [`MAX_ASPECT_AREA`] yield zero samples; panoramas and scan strips
/// would only ever match degenerate cells, so they are filtered here
/// and contribute nothing to the index.
pub fn sample(img: &DynamicImage, count: u32) -> ImageSamples {
    let rgba = img.to_rgba8();
    let aspect_ratio = AspectRatio::of(rgba.width(), rgba.height());

    let mut data = ImageSamples {
        aspect_ratio,
        samples: Vec::new(),
        lab_samples: HashMap::new(),
    };

    if aspect_ratio.area() > MAX_ASPECT_AREA {
        return data;
    }

    for multiple in 0..count {
        let (width, height) = aspect_ratio.size_at(multiple);
        let resized = imageops::resize(&rgba, width, height, FilterType::Nearest);
        data.lab_samples
            .insert((width, height), rgba_to_lab(resized.as_raw()));
        data.samples.push(resized);
    }

    data
}
