//! Corpus adapters supplying decoded candidate images by name
//!
//! The pipeline only ever sees the [`ImageSource`] trait: a listing of
//! opaque names and a decode-by-name lookup. Folder corpora are built
//! in; other source kinds plug in at the same seam.

use crate::io::error::Result;
use image::DynamicImage;

/// Folder-backed image source
pub mod folder;

/// Aspect-ratio cropping wrapper around any source
pub mod crop;

pub use crop::CropSource;
pub use folder::FolderSource;

// File extensions accepted as corpus entries
const IMAGE_EXTENSIONS: [&str; 4] = ["gif", "jpg", "jpeg", "png"];

/// A source of decoded candidate images
///
/// Implementations are shared across worker threads during indexing and
/// assembly, so lookups take `&self` and sources must be `Send + Sync`.
pub trait ImageSource: Send + Sync {
    /// List every image name this source can decode
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying listing fails
    fn image_names(&self) -> Result<Vec<String>>;

    /// Decode one image by name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unknown or the decode fails
    fn image(&self, name: &str) -> Result<DynamicImage>;
}

fn is_image_name(name: &str) -> bool {
    let extension = name.rsplit('.').next().unwrap_or_default();
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(extension))
}
