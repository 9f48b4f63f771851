//! Validates aspect-ratio reduction, tile-grid sizing, cropping, and paste bounds

use image::{Rgba, RgbaImage};
use tilemosaic::corpus::crop::{crop_size, crop_to_ratio};
use tilemosaic::spatial::aspect::AspectRatio;
use tilemosaic::spatial::grid::{TileGrid, min_tiles, scale_to_count};
use tilemosaic::spatial::paste;

#[test]
fn test_aspect_ratio_reduction() {
    assert_eq!(AspectRatio::of(3072, 4080), AspectRatio { x: 64, y: 85 });
    assert_eq!(AspectRatio::of(4080, 3060), AspectRatio { x: 4, y: 3 });
    assert_eq!(AspectRatio::of(1, 1), AspectRatio { x: 1, y: 1 });
}

#[test]
fn test_min_tiles_exactly_covers() {
    assert_eq!(
        min_tiles(AspectRatio { x: 1, y: 1 }, AspectRatio { x: 4, y: 3 }),
        TileGrid { cols: 3, rows: 4 }
    );
    assert_eq!(
        min_tiles(AspectRatio { x: 16, y: 9 }, AspectRatio { x: 4, y: 3 }),
        TileGrid { cols: 4, rows: 3 }
    );
}

#[test]
fn test_grid_scaling_to_target_count() {
    let standard = AspectRatio { x: 4, y: 3 };
    let wide = AspectRatio { x: 16, y: 9 };

    assert_eq!(
        scale_to_count(standard, standard, 100),
        TileGrid {
            cols: 100,
            rows: 100
        }
    );
    assert_eq!(
        scale_to_count(wide, standard, 100),
        TileGrid {
            cols: 100,
            rows: 75
        }
    );
    assert_eq!(
        scale_to_count(wide, standard, 101),
        TileGrid {
            cols: 104,
            rows: 78
        }
    );
}

// Cropping a portrait 3072x4080 capture to 4:3 keeps the full height and
// trims width to the nearest exact 3:4 multiple
#[test]
fn test_documented_crop_scenario() {
    assert_eq!(
        crop_size((3072, 4080), AspectRatio { x: 4, y: 3 }),
        (3060, 4080)
    );
}

#[test]
fn test_crop_is_centered() {
    let mut img = RgbaImage::from_pixel(10, 6, Rgba([0, 0, 0, 255]));
    // Mark the horizontal center so the crop anchor is observable
    img.put_pixel(5, 3, Rgba([255, 255, 255, 255]));

    let cropped = crop_to_ratio(
        &image::DynamicImage::ImageRgba8(img),
        AspectRatio { x: 1, y: 1 },
    );
    assert_eq!((cropped.width(), cropped.height()), (6, 6));

    let rgba = cropped.to_rgba8();
    assert_eq!(rgba.get_pixel(3, 3), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_paste_rejects_out_of_bounds_instead_of_clipping() {
    let mut canvas = RgbaImage::new(100, 100);
    let tile = RgbaImage::from_pixel(40, 30, Rgba([9, 9, 9, 255]));

    assert!(paste(&mut canvas, &tile, 60, 70).is_ok());
    assert!(paste(&mut canvas, &tile, 61, 70).is_err());
    assert!(paste(&mut canvas, &tile, 60, 71).is_err());
}

#[test]
fn test_parse_round_trips_display() {
    let ratio = AspectRatio::parse("16:9").map(|r| r.to_string());
    assert_eq!(ratio.ok(), Some("16:9".to_string()));
}
