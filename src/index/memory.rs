//! Memory-resident sample store
//!
//! Built once from a [`Storage`] collaborator at a single sampling
//! multiple, then searched read-only. Candidates register under their
//! natural aspect ratio and, when non-square, a 270-degree rotation of
//! their sample registers under the transposed ratio (the orientation
//! the assembler pastes in), so a search only ever consults the pool
//! matching its own query shape. Ranking uses the raw-space
//! luminance-weighted metric; no perceptual conversion is paid at build
//! or query time.

use crate::color::redmean_distance;
use crate::index::{SearchIndex, Storage, seeded_rng, select_fuzzy, validate_fuzziness};
use crate::io::error::{MosaicError, Result};
use crate::spatial::AspectRatio;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// In-memory index over one sampling multiple of a stored corpus
pub struct MemoryIndex {
    names: Vec<String>,
    multiple: u32,
    fuzziness: u32,
    samples: HashMap<AspectRatio, HashMap<usize, Vec<u8>>>,
    rng: Mutex<StdRng>,
}

impl MemoryIndex {
    /// Build an index from every candidate a storage holds
    ///
    /// # Errors
    ///
    /// Returns an error if a candidate lacks the requested sampling
    /// multiple (a hard index-build error, never a silent skip), if a
    /// load fails, or if the fuzziness exceeds the smallest per-shape
    /// candidate pool
    pub fn build(
        storage: &dyn Storage,
        multiple: u32,
        fuzziness: u32,
        seed: Option<u64>,
    ) -> Result<Self> {
        let keys = storage.keys()?;
        let mut index = Self {
            names: keys.clone(),
            multiple,
            fuzziness,
            samples: HashMap::new(),
            rng: Mutex::new(seeded_rng(seed)),
        };

        for (id, key) in keys.iter().enumerate() {
            let data = storage.load(key)?;
            let Some(sample) = data.samples.get(multiple as usize) else {
                return Err(MosaicError::MissingSample {
                    name: key.clone(),
                    multiple,
                });
            };

            index
                .samples
                .entry(data.aspect_ratio)
                .or_default()
                .insert(id, sample.as_raw().clone());

            if !data.aspect_ratio.is_square() {
                let rotated = imageops::rotate270(sample);
                index
                    .samples
                    .entry(data.aspect_ratio.transpose())
                    .or_default()
                    .insert(id, rotated.into_raw());
            }
        }

        let min_pool = index.samples.values().map(HashMap::len).min().unwrap_or(0);
        validate_fuzziness(fuzziness, min_pool)?;

        Ok(index)
    }
}

impl SearchIndex for MemoryIndex {
    fn search(&self, patch: &RgbaImage, tile_ratio: AspectRatio) -> Result<String> {
        let (width, height) = tile_ratio.size_at(self.multiple);
        let resized = imageops::resize(patch, width, height, FilterType::Nearest);

        let pool = self
            .samples
            .get(&tile_ratio)
            .ok_or(MosaicError::NoCandidates {
                resolution: (width, height),
            })?;

        let scored: Vec<(usize, f64)> = pool
            .iter()
            .map(|(&id, stored)| (id, redmean_distance(resized.as_raw(), stored)))
            .collect();

        let id = select_fuzzy(scored, self.fuzziness, &self.rng)?;
        self.names
            .get(id)
            .cloned()
            .ok_or(MosaicError::ImageNotFound {
                name: format!("id {id}"),
            })
    }
}
