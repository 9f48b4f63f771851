//! Center cropping to a target aspect ratio
//!
//! Assembly requires every candidate to have exactly the tile shape (or
//! its transpose). Wrapping a source in [`CropSource`] guarantees that:
//! each decode is center-cropped to the largest sub-rectangle that is an
//! exact integer multiple of the target ratio, transposed when the image
//! orientation disagrees with the ratio's.

use crate::corpus::ImageSource;
use crate::io::error::Result;
use crate::spatial::AspectRatio;
use image::DynamicImage;

/// The largest size within `size` that is an exact multiple of `ratio`
///
/// The ratio is transposed first when its orientation disagrees with the
/// input size. Cropping 3072x4080 to 4:3 therefore yields 3060x4080 (the
/// portrait image is cropped to 3:4).
pub fn crop_size(size: (u32, u32), ratio: AspectRatio) -> (u32, u32) {
    let (width, height) = size;
    let oriented = if (width > height) == (ratio.x > ratio.y) || ratio.is_square() {
        ratio
    } else {
        ratio.transpose()
    };

    let mut target_width = width - (width % oriented.x);
    let mut target_height = (target_width / oriented.x) * oriented.y;
    if target_height > height {
        target_height = height - (height % oriented.y);
        target_width = (target_height / oriented.y) * oriented.x;
    }
    (target_width, target_height)
}

/// Center-crop a decoded image to an exact multiple of the target ratio
pub fn crop_to_ratio(img: &DynamicImage, ratio: AspectRatio) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (target_width, target_height) = crop_size((width, height), ratio);
    let x = (width - target_width) / 2;
    let y = (height - target_height) / 2;
    img.crop_imm(x, y, target_width, target_height)
}

/// Source wrapper cropping every decode to a target aspect ratio
pub struct CropSource<S> {
    inner: S,
    target: AspectRatio,
}

impl<S: ImageSource> CropSource<S> {
    /// Wrap a source so every decode is cropped to `target`
    pub const fn new(inner: S, target: AspectRatio) -> Self {
        Self { inner, target }
    }
}

impl<S: ImageSource> ImageSource for CropSource<S> {
    fn image_names(&self) -> Result<Vec<String>> {
        self.inner.image_names()
    }

    fn image(&self, name: &str) -> Result<DynamicImage> {
        let img = self.inner.image(name)?;
        Ok(crop_to_ratio(&img, self.target))
    }
}
