//! Pipeline constants and runtime configuration defaults

/// Number of per-image samples taken at indexing time
///
/// Sample 0 is the 1x1 average color; sample i is an i-times-aspect-ratio
/// downsample.
pub const DEFAULT_SAMPLES: u32 = 4;

/// Number of top-ranked candidates a search picks from at random
pub const DEFAULT_FUZZINESS: u32 = 5;

/// Approximate tile count along the larger grid dimension
pub const DEFAULT_TILES: u32 = 100;

/// Multiple of the tile aspect ratio giving the output tile pixel size
pub const DEFAULT_TILE_MULTIPLE: u32 = 20;

/// Multiple of the tile aspect ratio sizing a reference image patch
pub const DEFAULT_REFERENCE_MULTIPLE: u32 = 2;

// Aspect ratios with reduced area beyond this are panoramas or scan strips
// that never plausibly tile
/// Maximum reduced aspect-ratio area accepted by the sampler
pub const MAX_ASPECT_AREA: u32 = 150;

/// Worker count for corpus indexing
pub const DEFAULT_INDEX_THREADS: usize = 4;

/// Worker count for per-cell tile selection
pub const DEFAULT_SELECTION_THREADS: usize = 10;

/// Worker count for per-candidate tile assembly
pub const DEFAULT_TILING_THREADS: usize = 16;

/// Default tile aspect ratio string
pub const DEFAULT_ASPECT_RATIO: &str = "4:3";

// Output settings
/// Suffix appended to the target filename for the assembled mosaic
pub const OUTPUT_SUFFIX: &str = ".mosaic.png";
