//! Analysis-cache storage
//!
//! A simpler persisted variant than the search index: full sample
//! sequences keyed by candidate name, used to rebuild the in-memory
//! index without re-decoding the corpus. Raw samples round-trip
//! byte-identically; perceptual vectors are derived data and are
//! recomputed on load.

use crate::analysis::ImageSamples;
use crate::color::rgba_to_lab;
use crate::index::codec;
use crate::io::error::{MosaicError, Result, store_format};
use crate::spatial::AspectRatio;
use image::RgbaImage;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Suffix appended to the corpus location for the analysis-cache file
pub const STORAGE_SUFFIX: &str = ".samples.bin";

const FORMAT_VERSION: u32 = 1;

/// Sampled-candidate persistence used to build memory-resident indexes
pub trait Storage: Send + Sync {
    /// List every stored candidate key, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails
    fn keys(&self) -> Result<Vec<String>>;

    /// Load the sample sequence stored under a key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or a stored sample is
    /// inconsistent with its recorded dimensions
    fn load(&self, key: &str) -> Result<ImageSamples>;

    /// Store a sample sequence under a key
    ///
    /// Candidates with zero samples are skipped, matching the index
    /// builder's no-op contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples cannot be recorded
    fn store(&self, key: &str, samples: &ImageSamples) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSample {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    aspect_ratio: AspectRatio,
    samples: Vec<StoredSample>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    entries: BTreeMap<String, StoredEntry>,
}

/// File-backed [`Storage`] sharing the store codec discipline
pub struct FileStorage {
    path: PathBuf,
    state: Mutex<StorageFile>,
}

/// Path of the analysis-cache file for a corpus location
pub fn storage_path(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_os_string();
    path.push(STORAGE_SUFFIX);
    PathBuf::from(path)
}

impl FileStorage {
    /// Start an empty cache for the given corpus location
    pub fn create(source: &Path) -> Self {
        Self {
            path: storage_path(source),
            state: Mutex::new(StorageFile {
                version: FORMAT_VERSION,
                ..StorageFile::default()
            }),
        }
    }

    /// Open an existing cache read-write
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or of an
    /// unsupported layout version
    pub fn open(source: &Path) -> Result<Self> {
        let path = storage_path(source);
        let file: StorageFile = codec::read_file(&path)?;
        if file.version != FORMAT_VERSION {
            return Err(store_format(
                &path,
                &format!(
                    "unsupported layout version {} (expected {FORMAT_VERSION})",
                    file.version
                ),
            ));
        }
        Ok(Self {
            path,
            state: Mutex::new(file),
        })
    }

    /// Persist the cache atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written durably
    pub fn flush(&self) -> Result<()> {
        let state = self.state.lock();
        codec::write_file(&self.path, &*state)
    }
}

impl Storage for FileStorage {
    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.state.lock().entries.keys().cloned().collect())
    }

    fn load(&self, key: &str) -> Result<ImageSamples> {
        let state = self.state.lock();
        let entry = state
            .entries
            .get(key)
            .ok_or_else(|| MosaicError::ImageNotFound {
                name: key.to_string(),
            })?;

        let mut samples = Vec::with_capacity(entry.samples.len());
        let mut lab_samples = HashMap::new();
        for stored in &entry.samples {
            let expected = stored.width as usize * stored.height as usize * 4;
            if stored.pixels.len() != expected {
                return Err(MosaicError::SampleSize {
                    expected,
                    actual: stored.pixels.len(),
                });
            }
            let image =
                RgbaImage::from_raw(stored.width, stored.height, stored.pixels.clone())
                    .ok_or(MosaicError::SampleSize {
                        expected,
                        actual: stored.pixels.len(),
                    })?;
            lab_samples.insert(
                (stored.width, stored.height),
                rgba_to_lab(image.as_raw()),
            );
            samples.push(image);
        }

        Ok(ImageSamples {
            aspect_ratio: entry.aspect_ratio,
            samples,
            lab_samples,
        })
    }

    fn store(&self, key: &str, samples: &ImageSamples) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let entry = StoredEntry {
            aspect_ratio: samples.aspect_ratio,
            samples: samples
                .samples
                .iter()
                .map(|sample| StoredSample {
                    width: sample.width(),
                    height: sample.height(),
                    pixels: sample.as_raw().clone(),
                })
                .collect(),
        };
        self.state.lock().entries.insert(key.to_string(), entry);
        Ok(())
    }
}
