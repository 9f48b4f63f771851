//! Tile selection
//!
//! The target image is rendered once at reference resolution, then every
//! grid cell's patch is matched against the sample store independently.
//! Cell order is irrelevant and no state is shared between cells; the
//! fallible collect is the single aggregation point and short-circuits
//! on the first search failure.

use crate::index::SearchIndex;
use crate::io::error::Result;
use crate::io::progress::TaskProgress;
use crate::pipeline::worker_pool;
use crate::spatial::aspect::AspectRatio;
use crate::spatial::grid::{Cell, TileGrid, scale_to_count};
use image::DynamicImage;
use image::imageops::{self, FilterType};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::collections::HashMap;

/// Tile selection parameters
#[derive(Debug, Clone, Copy)]
pub struct SelectorConfig {
    /// Approximate tile count along the larger grid dimension
    pub tiles: u32,
    /// Multiple of the tile aspect ratio sizing each reference patch
    pub reference_multiple: u32,
    /// Worker count for the per-cell search fan-out
    pub threads: usize,
}

/// Outcome of tile selection: the grid and each candidate's cells
#[derive(Debug)]
pub struct Selection {
    /// Grid the selections cover
    pub grid: TileGrid,
    /// Cells keyed by the candidate name chosen for them
    pub assignments: HashMap<String, Vec<Cell>>,
}

impl Selection {
    /// Number of distinct candidates selected
    pub fn distinct_candidates(&self) -> usize {
        self.assignments.len()
    }
}

/// Choose a candidate for every cell of the target's tile grid
///
/// The grid is the minimal exact cover of the target's aspect ratio by
/// `tile_ratio` tiles, scaled to the requested density. Exactly
/// `rows × cols` selections are aggregated; none are dropped or
/// duplicated.
///
/// # Errors
///
/// Returns an error if the worker pool cannot be built or any cell's
/// search fails; no partial selection is returned
pub fn select_tiles(
    index: &dyn SearchIndex,
    target: &DynamicImage,
    tile_ratio: AspectRatio,
    config: &SelectorConfig,
    progress: &TaskProgress,
) -> Result<Selection> {
    let target_ratio = AspectRatio::of(target.width(), target.height());
    let grid = scale_to_count(target_ratio, tile_ratio, config.tiles);

    let (patch_width, patch_height) = tile_ratio.size_at(config.reference_multiple);
    let reference = imageops::resize(
        &target.to_rgba8(),
        grid.cols * patch_width,
        grid.rows * patch_height,
        FilterType::Nearest,
    );

    let cells = grid.cells();
    progress.set_length(cells.len() as u64);

    let pool = worker_pool(config.threads)?;
    let selections: Result<Vec<(String, Cell)>> = pool.install(|| {
        cells
            .par_iter()
            .map(|&cell| {
                let patch = imageops::crop_imm(
                    &reference,
                    cell.col * patch_width,
                    cell.row * patch_height,
                    patch_width,
                    patch_height,
                )
                .to_image();
                let name = index.search(&patch, tile_ratio)?;
                progress.inc();
                Ok((name, cell))
            })
            .collect()
    });

    let mut assignments: HashMap<String, Vec<Cell>> = HashMap::new();
    for (name, cell) in selections? {
        assignments.entry(name).or_default().push(cell);
    }

    Ok(Selection { grid, assignments })
}
