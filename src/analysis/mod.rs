//! Candidate image analysis producing multi-resolution color signatures

/// Fixed-sequence downsampling of candidate images
pub mod sampler;

pub use sampler::{ImageSamples, sample};
