//! Command-line interface for indexing a corpus and building mosaics

use crate::analysis;
use crate::corpus::{CropSource, FolderSource, ImageSource};
use crate::index::{
    FileStorage, IndexBuilder, MemoryIndex, PersistentIndex, PersistentIndexBuilder, SearchIndex,
    Storage,
};
use crate::io::configuration::{
    DEFAULT_ASPECT_RATIO, DEFAULT_FUZZINESS, DEFAULT_INDEX_THREADS, DEFAULT_REFERENCE_MULTIPLE,
    DEFAULT_SAMPLES, DEFAULT_SELECTION_THREADS, DEFAULT_TILE_MULTIPLE, DEFAULT_TILES,
    DEFAULT_TILING_THREADS, OUTPUT_SUFFIX,
};
use crate::io::error::{MosaicError, Result};
use crate::io::progress::TaskProgress;
use crate::pipeline::{AssemblerConfig, SelectorConfig, assemble, select_tiles, worker_pool};
use crate::spatial::AspectRatio;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tilemosaic")]
#[command(
    author,
    version,
    about = "Generate photographic mosaics from an indexed image corpus"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Top-level operations
#[derive(Subcommand)]
pub enum Command {
    /// Index corpus images into a sample store
    Index(IndexArgs),
    /// Build a mosaic from a target image and a built store
    Build(BuildArgs),
}

/// Arguments for the index operation
#[derive(Args)]
pub struct IndexArgs {
    /// Corpus directory to index
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Number of samples to take per image
    #[arg(short, long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: u32,

    /// Number of indexing worker threads
    #[arg(short, long, default_value_t = DEFAULT_INDEX_THREADS)]
    pub threads: usize,
}

/// Arguments for the build operation
#[derive(Args)]
pub struct BuildArgs {
    /// Corpus directory with a previously built sample store
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Target image to reconstruct
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output path (defaults to the target path plus a mosaic suffix)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Approximate number of tiles along the larger grid dimension
    #[arg(long, default_value_t = DEFAULT_TILES)]
    pub tiles: u32,

    /// Number of top-ranked candidates to pick from at random
    #[arg(short, long, default_value_t = DEFAULT_FUZZINESS)]
    pub fuzziness: u32,

    /// Multiple of the tile aspect ratio giving the output tile size
    #[arg(long, default_value_t = DEFAULT_TILE_MULTIPLE)]
    pub tile_multiple: u32,

    /// Multiple of the tile aspect ratio sizing a reference patch
    #[arg(long, default_value_t = DEFAULT_REFERENCE_MULTIPLE)]
    pub reference_multiple: u32,

    /// Tile aspect ratio as W:H
    #[arg(long, default_value = DEFAULT_ASPECT_RATIO)]
    pub aspect_ratio: String,

    /// How the tile aspect ratio is chosen
    #[arg(long, value_enum, default_value = "fixed")]
    pub aspect_mode: AspectMode,

    /// Search an in-memory index built from the analysis cache
    #[arg(long)]
    pub in_memory: bool,

    /// Seed for reproducible fuzzy selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of tile selection worker threads
    #[arg(long, default_value_t = DEFAULT_SELECTION_THREADS)]
    pub selection_threads: usize,

    /// Number of assembly worker threads
    #[arg(long, default_value_t = DEFAULT_TILING_THREADS)]
    pub tiling_threads: usize,
}

/// Tile aspect-ratio handling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AspectMode {
    /// Use the ratio given by `--aspect-ratio`
    Fixed,
    /// Snap the target's own ratio to the nearest conventional one
    Nearest,
}

/// Executes the parsed command against the pipeline
pub struct CommandRunner {
    cli: Cli,
}

impl CommandRunner {
    /// Create a runner for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected operation
    ///
    /// # Errors
    ///
    /// Returns the first configuration, I/O, or pipeline error; every
    /// failure aborts the whole run
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Command::Index(args) => self.run_index(args),
            Command::Build(args) => self.run_build(args),
        }
    }

    // Allow print for phase timing feedback
    #[allow(clippy::print_stderr)]
    fn run_index(&self, args: &IndexArgs) -> Result<()> {
        let start = Instant::now();
        let source = FolderSource::open(&args.corpus)?;
        let names = source.image_names()?;

        let builder = PersistentIndexBuilder::create(&args.corpus);
        let storage = FileStorage::create(&args.corpus);
        let progress = TaskProgress::start("Indexing", names.len() as u64, self.cli.quiet);

        let pool = worker_pool(args.threads)?;
        pool.install(|| {
            names.par_iter().try_for_each(|name| {
                let img = source.image(name)?;
                let data = analysis::sample(&img, args.samples);
                builder.index(name, &data)?;
                storage.store(name, &data)?;
                progress.inc();
                Ok::<(), MosaicError>(())
            })
        })?;

        builder.finish()?;
        storage.flush()?;
        progress.finish();

        if !self.cli.quiet {
            eprintln!("Indexed {} images in {:.1?}", names.len(), start.elapsed());
        }
        Ok(())
    }

    // Allow print for phase timing feedback
    #[allow(clippy::print_stderr)]
    fn run_build(&self, args: &BuildArgs) -> Result<()> {
        let target = image::open(&args.target).map_err(|e| MosaicError::ImageLoad {
            name: args.target.display().to_string(),
            source: e,
        })?;

        let tile_ratio = match args.aspect_mode {
            AspectMode::Fixed => AspectRatio::parse(&args.aspect_ratio)?,
            AspectMode::Nearest => {
                AspectRatio::of(target.width(), target.height()).nearest_sane()
            }
        };
        let target = crate::corpus::crop::crop_to_ratio(&target, tile_ratio);

        let index: Box<dyn SearchIndex> = if args.in_memory {
            let storage = FileStorage::open(&args.corpus)?;
            Box::new(MemoryIndex::build(
                &storage,
                args.reference_multiple,
                args.fuzziness,
                args.seed,
            )?)
        } else {
            Box::new(PersistentIndex::open(
                &args.corpus,
                args.reference_multiple,
                args.fuzziness,
                args.seed,
            )?)
        };

        let source = CropSource::new(FolderSource::open(&args.corpus)?, tile_ratio);

        let start = Instant::now();
        let progress = TaskProgress::start("Selecting", 0, self.cli.quiet);
        let selection = select_tiles(
            index.as_ref(),
            &target,
            tile_ratio,
            &SelectorConfig {
                tiles: args.tiles,
                reference_multiple: args.reference_multiple,
                threads: args.selection_threads,
            },
            &progress,
        )?;
        progress.finish();

        if !self.cli.quiet {
            eprintln!(
                "Selected {} cells ({} unique images) in {:.1?}",
                selection.grid.cell_count(),
                selection.distinct_candidates(),
                start.elapsed()
            );
        }

        let start = Instant::now();
        let progress = TaskProgress::start("Assembling", 0, self.cli.quiet);
        let canvas = assemble(
            &source,
            &selection,
            tile_ratio,
            &AssemblerConfig {
                tile_multiple: args.tile_multiple,
                threads: args.tiling_threads,
            },
            &progress,
        )?;
        progress.finish();

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.target));
        canvas.save(&output).map_err(|e| MosaicError::ImageExport {
            path: output.clone(),
            source: e,
        })?;

        if !self.cli.quiet {
            eprintln!(
                "Assembled {} in {:.1?}",
                output.display(),
                start.elapsed()
            );
        }
        Ok(())
    }
}

fn default_output_path(target: &Path) -> PathBuf {
    let mut output = target.as_os_str().to_os_string();
    output.push(OUTPUT_SUFFIX);
    PathBuf::from(output)
}
