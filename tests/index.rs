//! Validates store persistence, search determinism, fuzziness fairness, and validation

use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::HashSet;
use std::path::Path;
use tilemosaic::analysis;
use tilemosaic::index::{
    FileStorage, IndexBuilder, MemoryIndex, PersistentIndex, PersistentIndexBuilder, SearchIndex,
    Storage,
};
use tilemosaic::spatial::AspectRatio;

const SAMPLES: u32 = 3;

fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

fn patch(color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(8, 6, Rgba(color))
}

// Builds a persistent index of solid 4:3 candidates next to `corpus`
fn build_index(corpus: &Path, candidates: &[(&str, [u8; 4])]) {
    let builder = PersistentIndexBuilder::create(corpus);
    for (name, color) in candidates {
        let data = analysis::sample(&solid(400, 300, *color), SAMPLES);
        builder.index(name, &data).ok();
    }
    assert!(builder.finish().is_ok());
}

#[test]
fn test_raw_samples_round_trip_byte_identical() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");

    let storage = FileStorage::create(&corpus);
    let original = analysis::sample(&solid(400, 300, [13, 57, 101, 255]), SAMPLES);
    assert!(storage.store("a.png", &original).is_ok());
    assert!(storage.flush().is_ok());

    let reopened = FileStorage::open(&corpus);
    let Ok(reopened) = reopened else {
        unreachable!("storage file must reopen");
    };
    let Ok(loaded) = reopened.load("a.png") else {
        unreachable!("stored key must load");
    };

    assert_eq!(loaded.aspect_ratio, original.aspect_ratio);
    assert_eq!(loaded.samples.len(), original.samples.len());
    for (loaded_sample, original_sample) in loaded.samples.iter().zip(original.samples.iter()) {
        assert_eq!(loaded_sample.as_raw(), original_sample.as_raw());
    }
}

#[test]
fn test_empty_candidates_are_skipped_not_errors() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");

    let builder = PersistentIndexBuilder::create(&corpus);
    // A 100:1 panorama reduces past the sampler's area limit
    let panorama = analysis::sample(&solid(3000, 30, [1, 2, 3, 255]), SAMPLES);
    assert!(panorama.is_empty());
    assert!(builder.index("panorama.png", &panorama).is_ok());

    let data = analysis::sample(&solid(400, 300, [1, 2, 3, 255]), SAMPLES);
    assert!(builder.index("kept.png", &data).is_ok());
    assert!(builder.finish().is_ok());

    let index = PersistentIndex::open(&corpus, 1, 1, Some(0));
    let Ok(index) = index else {
        unreachable!("index must open");
    };
    let found = index.search(&patch([1, 2, 3, 255]), AspectRatio { x: 4, y: 3 });
    assert_eq!(found.ok(), Some("kept.png".to_string()));
}

#[test]
fn test_search_is_deterministic_at_fuzziness_one() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");
    build_index(
        &corpus,
        &[
            ("red.png", [255, 0, 0, 255]),
            ("green.png", [0, 255, 0, 255]),
            ("blue.png", [0, 0, 255, 255]),
        ],
    );

    let index = PersistentIndex::open(&corpus, 1, 1, None);
    let Ok(index) = index else {
        unreachable!("index must open");
    };

    for _ in 0..20 {
        let found = index.search(&patch([250, 10, 10, 255]), AspectRatio { x: 4, y: 3 });
        assert_eq!(found.ok(), Some("red.png".to_string()));
    }
}

#[test]
fn test_fuzzy_search_stays_within_true_top_k() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");
    build_index(
        &corpus,
        &[
            ("red.png", [255, 0, 0, 255]),
            ("dark-red.png", [180, 0, 0, 255]),
            ("blue.png", [0, 0, 255, 255]),
            ("green.png", [0, 255, 0, 255]),
        ],
    );

    let index = PersistentIndex::open(&corpus, 1, 2, Some(99));
    let Ok(index) = index else {
        unreachable!("index must open");
    };

    let mut seen = HashSet::new();
    for _ in 0..100 {
        if let Ok(name) = index.search(&patch([255, 0, 0, 255]), AspectRatio { x: 4, y: 3 }) {
            seen.insert(name);
        }
    }

    // Only the two nearest reds may ever appear; rank three and four never
    assert!(seen.contains("red.png"));
    assert!(!seen.contains("blue.png"));
    assert!(!seen.contains("green.png"));
    assert!(seen.len() <= 2);
}

#[test]
fn test_rotated_orientation_widens_the_pool() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");

    // Only a portrait candidate is indexed; its samples live at 3:4 sizes
    let builder = PersistentIndexBuilder::create(&corpus);
    let data = analysis::sample(&solid(300, 400, [10, 200, 10, 255]), SAMPLES);
    assert!(builder.index("portrait.png", &data).is_ok());
    assert!(builder.finish().is_ok());

    let index = PersistentIndex::open(&corpus, 1, 1, Some(0));
    let Ok(index) = index else {
        unreachable!("index must open");
    };

    // A landscape query still finds it through the rotated resolution
    let found = index.search(&patch([10, 200, 10, 255]), AspectRatio { x: 4, y: 3 });
    assert_eq!(found.ok(), Some("portrait.png".to_string()));
}

#[test]
fn test_fuzziness_validation_rejects_bad_configs() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");
    build_index(
        &corpus,
        &[
            ("red.png", [255, 0, 0, 255]),
            ("blue.png", [0, 0, 255, 255]),
        ],
    );

    assert!(PersistentIndex::open(&corpus, 1, 0, None).is_err());
    assert!(PersistentIndex::open(&corpus, 1, 3, None).is_err());
    assert!(PersistentIndex::open(&corpus, 1, 2, None).is_ok());
}

#[test]
fn test_corrupt_store_files_are_rejected() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");

    assert!(std::fs::write(tilemosaic::index::persistent::index_path(&corpus), b"not a store").is_ok());
    assert!(std::fs::write(tilemosaic::index::storage::storage_path(&corpus), b"junk").is_ok());

    assert!(PersistentIndex::open(&corpus, 1, 1, None).is_err());
    assert!(FileStorage::open(&corpus).is_err());
}

#[test]
fn test_opening_a_missing_store_fails() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("nothing-here");
    assert!(PersistentIndex::open(&corpus, 1, 1, None).is_err());
}

#[test]
fn test_memory_index_requires_the_sampling_multiple() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");

    let storage = FileStorage::create(&corpus);
    let data = analysis::sample(&solid(400, 300, [9, 9, 9, 255]), 2);
    assert!(storage.store("small.png", &data).is_ok());

    // Samples 0 and 1 exist; multiple 2 does not
    assert!(MemoryIndex::build(&storage, 2, 1, None).is_err());
    assert!(MemoryIndex::build(&storage, 1, 1, None).is_ok());
}

#[test]
fn test_memory_index_matches_nearest_raw_color() {
    let dir = tempfile::tempdir().ok();
    let Some(dir) = dir else {
        return;
    };
    let corpus = dir.path().join("corpus");

    let storage = FileStorage::create(&corpus);
    for (name, color) in [
        ("red.png", [255u8, 0, 0, 255]),
        ("blue.png", [0, 0, 255, 255]),
    ] {
        let data = analysis::sample(&solid(400, 300, color), SAMPLES);
        assert!(storage.store(name, &data).is_ok());
    }

    let index = MemoryIndex::build(&storage, 1, 1, Some(5));
    let Ok(index) = index else {
        unreachable!("memory index must build");
    };

    let found = index.search(&patch([0, 20, 240, 255]), AspectRatio { x: 4, y: 3 });
    assert_eq!(found.ok(), Some("blue.png".to_string()));
}
