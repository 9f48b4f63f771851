//! Error types for index construction, search, and mosaic assembly

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to decode an image from the corpus or filesystem
    ImageLoad {
        /// Name or path of the image
        name: String,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to save the assembled mosaic to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to encode or decode a persisted store file
    StoreEncoding {
        /// Path of the store file
        path: PathBuf,
        /// Underlying serialization error
        source: bincode::Error,
    },

    /// Persisted store file has an unusable layout
    StoreFormat {
        /// Path of the store file
        path: PathBuf,
        /// Description of what is wrong with the layout
        reason: String,
    },

    /// Parameter validation failed before the pipeline started
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// No candidate samples exist at the resolution a search requires
    NoCandidates {
        /// Sample resolution that came up empty
        resolution: (u32, u32),
    },

    /// A candidate lacks the sampling multiple the index was configured with
    MissingSample {
        /// Candidate name
        name: String,
        /// Requested sampling multiple
        multiple: u32,
    },

    /// Stored sample byte count disagrees with its recorded dimensions
    SampleSize {
        /// Expected byte count (width × height × 4)
        expected: usize,
        /// Actual byte count found
        actual: usize,
    },

    /// A tile paste would write outside the destination canvas
    PasteOutOfBounds {
        /// Tile dimensions being pasted
        tile: (u32, u32),
        /// Paste offset in canvas pixels
        offset: (u32, u32),
        /// Destination canvas dimensions
        canvas: (u32, u32),
    },

    /// A corpus entry was requested by a name the source does not know
    ImageNotFound {
        /// Requested image name
        name: String,
    },

    /// Corpus location is neither a usable folder nor a known source kind
    UnsupportedCorpus {
        /// Path that was rejected
        path: PathBuf,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { name, source } => {
                write!(f, "Failed to load image '{name}': {source}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export mosaic to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::StoreEncoding { path, source } => {
                write!(f, "Store codec error for '{}': {source}", path.display())
            }
            Self::StoreFormat { path, reason } => {
                write!(f, "Unusable store file '{}': {reason}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::NoCandidates { resolution } => {
                write!(
                    f,
                    "No candidate samples at resolution {}x{}",
                    resolution.0, resolution.1
                )
            }
            Self::MissingSample { name, multiple } => {
                write!(f, "Sampling multiple {multiple} not available for '{name}'")
            }
            Self::SampleSize { expected, actual } => {
                write!(
                    f,
                    "Sample byte count mismatch: expected {expected}, found {actual}"
                )
            }
            Self::PasteOutOfBounds {
                tile,
                offset,
                canvas,
            } => {
                write!(
                    f,
                    "Tile {}x{} at offset ({}, {}) exceeds canvas {}x{}",
                    tile.0, tile.1, offset.0, offset.1, canvas.0, canvas.1
                )
            }
            Self::ImageNotFound { name } => {
                write!(f, "Image not found: {name}")
            }
            Self::UnsupportedCorpus { path } => {
                write!(f, "Unrecognized corpus location '{}'", path.display())
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::StoreEncoding { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a store format error
pub fn store_format(path: &std::path::Path, reason: &impl ToString) -> MosaicError {
    MosaicError::StoreFormat {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
