//! Mosaic assembly
//!
//! Every distinct selected candidate is loaded and prepared exactly
//! once, then pasted at each cell that chose it. Cell rectangles never
//! overlap, so workers only contend on the canvas lock for the duration
//! of a row copy; decode, rotation, and resize all run outside it.

use crate::corpus::ImageSource;
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::progress::TaskProgress;
use crate::pipeline::selector::Selection;
use crate::pipeline::worker_pool;
use crate::spatial::aspect::AspectRatio;
use crate::spatial::paste::paste;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use parking_lot::Mutex;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

/// Mosaic assembly parameters
#[derive(Debug, Clone, Copy)]
pub struct AssemblerConfig {
    /// Multiple of the tile aspect ratio giving the tile pixel size
    pub tile_multiple: u32,
    /// Worker count for the per-candidate fan-out
    pub threads: usize,
}

/// Compose the output canvas from a tile selection
///
/// The canvas is `tile size × grid` and starts fully transparent. A
/// candidate whose natural aspect ratio is the transpose of the tile
/// ratio is rotated 270 degrees, the inverse of the quarter turn the
/// search applied to the query, so it pastes in exactly the orientation
/// it was matched in.
///
/// # Errors
///
/// Returns an error if a candidate fails to load or a paste would fall
/// outside the canvas; the partially assembled canvas is discarded
pub fn assemble(
    source: &dyn ImageSource,
    selection: &Selection,
    tile_ratio: AspectRatio,
    config: &AssemblerConfig,
    progress: &TaskProgress,
) -> Result<RgbaImage> {
    if config.tile_multiple == 0 {
        return Err(invalid_parameter(
            "tile-multiple",
            &config.tile_multiple,
            &"must be at least 1",
        ));
    }

    let (tile_width, tile_height) = tile_ratio.size_at(config.tile_multiple);
    let grid = selection.grid;
    let canvas = Mutex::new(RgbaImage::new(tile_width * grid.cols, tile_height * grid.rows));
    progress.set_length(grid.cell_count());

    let pool = worker_pool(config.threads)?;
    let assignments: Vec<(&String, &Vec<crate::spatial::Cell>)> =
        selection.assignments.iter().collect();

    pool.install(|| {
        assignments.par_iter().try_for_each(|(name, cells)| {
            let decoded = source.image(name.as_str())?;
            let natural = AspectRatio::of(decoded.width(), decoded.height());

            let upright = if !tile_ratio.is_square() && natural == tile_ratio.transpose() {
                imageops::rotate270(&decoded.to_rgba8())
            } else {
                decoded.to_rgba8()
            };
            let tile = imageops::resize(&upright, tile_width, tile_height, FilterType::Nearest);

            for cell in cells.iter() {
                let mut locked = canvas.lock();
                paste(&mut locked, &tile, cell.col * tile_width, cell.row * tile_height)?;
                drop(locked);
                progress.inc();
            }
            Ok::<(), MosaicError>(())
        })
    })?;

    Ok(canvas.into_inner())
}
