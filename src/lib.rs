//! Photographic mosaic generation from a persisted color-signature index
//!
//! The system indexes a corpus of candidate images by multi-resolution
//! color signature, then reconstructs a target image as a grid of tiles,
//! each cell filled by the candidate whose signature best matches that
//! region of the target.

#![forbid(unsafe_code)]

/// Multi-resolution color signature extraction from candidate images
pub mod analysis;
/// Perceptual color conversion and sample distance metrics
pub mod color;
/// Corpus adapters supplying decoded images by name
pub mod corpus;
/// Sample store construction and fuzzy nearest-candidate search
pub mod index;
/// Command-line interface, errors, and progress reporting
pub mod io;
/// Concurrent tile selection and mosaic assembly
pub mod pipeline;
/// Aspect-ratio arithmetic, grid sizing, and raster paste
pub mod spatial;

pub use io::error::{MosaicError, Result};
