//! Validates the index and build commands against an on-disk corpus

use image::{Rgba, RgbaImage};
use std::path::Path;
use tilemosaic::io::cli::{
    AspectMode, BuildArgs, Cli, Command, CommandRunner, IndexArgs,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn write_solid(path: &Path, color: [u8; 4]) {
    let img = RgbaImage::from_pixel(400, 300, Rgba(color));
    assert!(img.save(path).is_ok());
}

fn write_checkerboard(path: &Path) {
    let img = RgbaImage::from_fn(400, 300, |x, y| {
        if (x / 100 + y / 75) % 2 == 0 {
            Rgba(RED)
        } else {
            Rgba(BLUE)
        }
    });
    assert!(img.save(path).is_ok());
}

fn build_args(corpus: &Path, target: &Path, output: &Path, in_memory: bool) -> BuildArgs {
    BuildArgs {
        corpus: corpus.to_path_buf(),
        target: target.to_path_buf(),
        output: Some(output.to_path_buf()),
        tiles: 4,
        fuzziness: 1,
        tile_multiple: 2,
        reference_multiple: 2,
        aspect_ratio: "4:3".to_string(),
        aspect_mode: AspectMode::Fixed,
        in_memory,
        seed: Some(1),
        selection_threads: 2,
        tiling_threads: 2,
    }
}

#[test]
fn test_index_then_build_produces_a_mosaic_file() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };

    let corpus = dir.path().join("corpus");
    assert!(std::fs::create_dir(&corpus).is_ok());
    write_solid(&corpus.join("red.png"), RED);
    write_solid(&corpus.join("blue.png"), BLUE);

    let target = dir.path().join("target.png");
    write_checkerboard(&target);

    let index_run = CommandRunner::new(Cli {
        command: Command::Index(IndexArgs {
            corpus: corpus.clone(),
            samples: 4,
            threads: 2,
        }),
        quiet: true,
    });
    assert!(index_run.run().is_ok());

    // Both store variants must exist next to the corpus
    assert!(dir.path().join("corpus.index.bin").is_file());
    assert!(dir.path().join("corpus.samples.bin").is_file());

    for (in_memory, output_name) in [(false, "persistent.png"), (true, "memory.png")] {
        let output = dir.path().join(output_name);
        let build_run = CommandRunner::new(Cli {
            command: Command::Build(build_args(&corpus, &target, &output, in_memory)),
            quiet: true,
        });
        assert!(build_run.run().is_ok());

        let mosaic = image::open(&output).map(|img| (img.width(), img.height()));
        // 4x4 grid of 8x6 tiles
        assert_eq!(mosaic.ok(), Some((32, 24)));
    }
}

#[test]
fn test_build_without_an_index_is_a_configuration_error() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };

    let corpus = dir.path().join("corpus");
    assert!(std::fs::create_dir(&corpus).is_ok());
    let target = dir.path().join("target.png");
    write_checkerboard(&target);

    let output = dir.path().join("out.png");
    let run = CommandRunner::new(Cli {
        command: Command::Build(build_args(&corpus, &target, &output, false)),
        quiet: true,
    });
    assert!(run.run().is_err());
    assert!(!output.exists());
}

#[test]
fn test_index_rejects_a_missing_corpus() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };

    let run = CommandRunner::new(Cli {
        command: Command::Index(IndexArgs {
            corpus: dir.path().join("absent"),
            samples: 4,
            threads: 2,
        }),
        quiet: true,
    });
    assert!(run.run().is_err());
}
