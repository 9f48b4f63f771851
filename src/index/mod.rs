//! Sample store: index construction and fuzzy nearest-candidate search
//!
//! Two substitutable index implementations satisfy the same contract: a
//! persistent file-backed index searched in perceptual space, and a
//! memory-resident index built from a [`Storage`] collaborator and
//! searched in raw color space. Build mode and search mode are separate
//! types; a store written by one process reopens read-only in another.

use crate::analysis::ImageSamples;
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::AspectRatio;
use image::RgbaImage;
use parking_lot::Mutex;
use rand::Rng;
use rand::rngs::StdRng;

mod codec;
/// Memory-resident index built from a storage collaborator
pub mod memory;
/// File-backed index with precomputed perceptual samples
pub mod persistent;
/// Analysis-cache persistence for sampled candidates
pub mod storage;

pub use memory::MemoryIndex;
pub use persistent::{PersistentIndex, PersistentIndexBuilder};
pub use storage::{FileStorage, Storage};

/// Write side of a sample store
///
/// Implementations batch concurrent `index` calls internally, so one
/// builder is shared across the indexing worker pool. Identifiers are
/// assigned monotonically and never reused; duplicate names are allowed
/// (the same corpus entry may legitimately be indexed twice).
pub trait IndexBuilder: Send + Sync {
    /// Record one candidate's samples under a new identifier
    ///
    /// A candidate with zero samples is a no-op, not an error: the
    /// sampler filters implausible shapes upstream and those images
    /// simply contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the samples cannot be recorded
    fn index(&self, name: &str, samples: &ImageSamples) -> Result<()>;

    /// Persist the store and end build mode
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written durably
    fn finish(&self) -> Result<()>;
}

/// Read side of a sample store
///
/// Search is read-only and safe for unlimited concurrent callers.
pub trait SearchIndex: Send + Sync {
    /// Find the best-matching candidate name for a query patch
    ///
    /// The patch is resized to the store's sample resolution for the
    /// given aspect ratio before ranking.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidates exist at the required
    /// resolution or if the fuzziness exceeds the ranked pool
    fn search(&self, patch: &RgbaImage, tile_ratio: AspectRatio) -> Result<String>;
}

/// Validate a fuzziness setting against the smallest candidate pool
pub(crate) fn validate_fuzziness(fuzziness: u32, min_pool: usize) -> Result<()> {
    if fuzziness == 0 {
        return Err(invalid_parameter(
            "fuzziness",
            &fuzziness,
            &"must be at least 1",
        ));
    }
    if fuzziness as usize > min_pool {
        return Err(invalid_parameter(
            "fuzziness",
            &fuzziness,
            &format!("exceeds the smallest candidate pool ({min_pool})"),
        ));
    }
    Ok(())
}

/// Rank candidates ascending by distance and pick among the closest
///
/// The pick is uniform over the `fuzziness` nearest entries, drawn from
/// the injected generator so search behavior is reproducible under a
/// fixed seed.
pub(crate) fn select_fuzzy<T: Copy>(
    mut scored: Vec<(T, f64)>,
    fuzziness: u32,
    rng: &Mutex<StdRng>,
) -> Result<T> {
    if fuzziness == 0 || fuzziness as usize > scored.len() {
        return Err(invalid_parameter(
            "fuzziness",
            &fuzziness,
            &format!("outside the ranked candidate pool (size {})", scored.len()),
        ));
    }
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let pick = rng.lock().random_range(0..fuzziness as usize);
    scored
        .get(pick)
        .map(|(id, _)| *id)
        .ok_or_else(|| invalid_parameter("fuzziness", &fuzziness, &"empty candidate pool"))
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    use rand::SeedableRng;
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
