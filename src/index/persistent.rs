//! File-backed sample store
//!
//! The store file is a versioned snapshot of three trees: identifier to
//! name, resolution to raw samples by identifier, and resolution to
//! packed perceptual vectors by identifier. Build mode accumulates
//! batched writes behind a lock and commits once, atomically, at
//! `finish`; search mode loads the snapshot read-only and ranks in
//! perceptual space against the vectors precomputed at build time.

use crate::analysis::ImageSamples;
use crate::color::{lab_distance, rgba_to_lab};
use crate::index::codec;
use crate::index::{IndexBuilder, SearchIndex, seeded_rng, select_fuzzy, validate_fuzziness};
use crate::io::error::{MosaicError, Result, store_format};
use crate::spatial::AspectRatio;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Suffix appended to the corpus location for the search index file
pub const INDEX_SUFFIX: &str = ".index.bin";

const FORMAT_VERSION: u32 = 1;

type SampleTree<T> = BTreeMap<(u32, u32), BTreeMap<u64, Vec<T>>>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    names: BTreeMap<u64, String>,
    raw_samples: SampleTree<u8>,
    lab_samples: SampleTree<f64>,
}

/// Path of the index file for a corpus location
pub fn index_path(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_os_string();
    path.push(INDEX_SUFFIX);
    PathBuf::from(path)
}

struct BuilderState {
    file: IndexFile,
    next_id: u64,
}

/// Build-mode handle for a file-backed store
pub struct PersistentIndexBuilder {
    path: PathBuf,
    state: Mutex<BuilderState>,
}

impl PersistentIndexBuilder {
    /// Start a fresh store for the given corpus location
    ///
    /// Any existing index file for the location is replaced when
    /// `finish` commits.
    pub fn create(source: &Path) -> Self {
        Self {
            path: index_path(source),
            state: Mutex::new(BuilderState {
                file: IndexFile {
                    version: FORMAT_VERSION,
                    ..IndexFile::default()
                },
                next_id: 0,
            }),
        }
    }
}

impl IndexBuilder for PersistentIndexBuilder {
    fn index(&self, name: &str, samples: &ImageSamples) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.file.names.insert(id, name.to_string());

        for sample in &samples.samples {
            state
                .file
                .raw_samples
                .entry(sample.dimensions())
                .or_default()
                .insert(id, sample.as_raw().clone());
        }
        for (size, lab) in &samples.lab_samples {
            state
                .file
                .lab_samples
                .entry(*size)
                .or_default()
                .insert(id, lab.clone());
        }
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        let state = self.state.lock();
        codec::write_file(&self.path, &state.file)
    }
}

/// Search-mode handle for a file-backed store
pub struct PersistentIndex {
    path: PathBuf,
    names: BTreeMap<u64, String>,
    lab_samples: SampleTree<f64>,
    multiple: u32,
    fuzziness: u32,
    rng: Mutex<StdRng>,
}

impl PersistentIndex {
    /// Open a built store read-only
    ///
    /// Validates the format version, every stored sample's byte count
    /// against its recorded resolution, and the fuzziness against the
    /// smallest candidate pool over all resolutions.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, of another
    /// version, internally inconsistent, or if the fuzziness cannot be
    /// satisfied
    pub fn open(source: &Path, multiple: u32, fuzziness: u32, seed: Option<u64>) -> Result<Self> {
        let path = index_path(source);
        let file: IndexFile = codec::read_file(&path)?;

        if file.version != FORMAT_VERSION {
            return Err(store_format(
                &path,
                &format!(
                    "unsupported layout version {} (expected {FORMAT_VERSION})",
                    file.version
                ),
            ));
        }

        for (&(width, height), by_id) in &file.raw_samples {
            let expected = width as usize * height as usize * 4;
            for raw in by_id.values() {
                if raw.len() != expected {
                    return Err(MosaicError::SampleSize {
                        expected,
                        actual: raw.len(),
                    });
                }
            }
        }

        let min_pool = file
            .lab_samples
            .values()
            .map(BTreeMap::len)
            .min()
            .unwrap_or(0);
        validate_fuzziness(fuzziness, min_pool)?;

        Ok(Self {
            path,
            names: file.names,
            lab_samples: file.lab_samples,
            multiple,
            fuzziness,
            rng: Mutex::new(seeded_rng(seed)),
        })
    }

    fn rank_at(&self, size: (u32, u32), query: &[f64], scored: &mut Vec<(u64, f64)>) {
        if let Some(pool) = self.lab_samples.get(&size) {
            for (&id, stored) in pool {
                scored.push((id, lab_distance(query, stored)));
            }
        }
    }
}

impl SearchIndex for PersistentIndex {
    fn search(&self, patch: &RgbaImage, tile_ratio: AspectRatio) -> Result<String> {
        let (width, height) = tile_ratio.size_at(self.multiple);
        let resized = imageops::resize(patch, width, height, FilterType::Nearest);
        let query = rgba_to_lab(resized.as_raw());

        let mut scored = Vec::new();
        self.rank_at((width, height), &query, &mut scored);

        // A non-square query also matches candidates stored in the
        // orthogonal orientation; rotate the query a quarter turn
        // clockwise and rank against the transposed resolution
        if width != height {
            let rotated = imageops::rotate90(&resized);
            let rotated_query = rgba_to_lab(rotated.as_raw());
            self.rank_at((height, width), &rotated_query, &mut scored);
        }

        if scored.is_empty() {
            return Err(MosaicError::NoCandidates {
                resolution: (width, height),
            });
        }

        let id = select_fuzzy(scored, self.fuzziness, &self.rng)?;
        self.names
            .get(&id)
            .cloned()
            .ok_or_else(|| store_format(&self.path, &format!("no name recorded for id {id}")))
    }
}
