use std::path::PathBuf;

use bgremover::{Method, ProcessOptions, RemovalEngine, StrategyKind};
use image::{Rgba, RgbaImage};

/// Solid blue field with a centered 40x40 red square.
fn red_square_on_blue() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 255, 255]));
    for y in 30..70 {
        for x in 30..70 {
            img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }
    img
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bgremover_it_{}_{name}", std::process::id()))
}

#[test]
fn every_method_preserves_dimensions() {
    let engine = RemovalEngine::new();
    let img = red_square_on_blue();
    for method in [Method::Smart, Method::White, Method::Edge, Method::Color] {
        let out = engine.process(&img, method);
        assert_eq!(out.dimensions(), img.dimensions(), "{method}");
    }
}

#[test]
fn processing_is_deterministic() {
    let engine = RemovalEngine::new();
    let img = red_square_on_blue();
    for method in [Method::Smart, Method::White, Method::Edge, Method::Color] {
        let a = engine.process(&img, method);
        let b = engine.process(&img, method);
        assert_eq!(a.as_raw(), b.as_raw(), "{method}");
    }
}

#[test]
fn ensemble_agrees_on_the_subject() {
    let engine = RemovalEngine::new();
    let img = red_square_on_blue();
    let out = engine.process(&img, Method::Smart);

    // At least two of the three voters keep every interior subject pixel, and
    // the voters agree on its color, so the average is exact.
    for y in 33..67 {
        for x in 33..67 {
            assert_eq!(out.get_pixel(x, y), &Rgba([255, 0, 0, 255]), "at ({x},{y})");
        }
    }
    // Background far from both the subject and the center seed is dropped.
    for (x, y) in [(5, 5), (95, 95), (95, 5), (5, 95)] {
        assert_eq!(out.get_pixel(x, y), &Rgba([0, 0, 0, 0]), "at ({x},{y})");
    }
}

#[test]
fn single_strategies_keep_the_subject() {
    let engine = RemovalEngine::new();
    let img = red_square_on_blue();

    for kind in [StrategyKind::CenterSeed, StrategyKind::BorderHistogram] {
        let out = engine.segment(&img, kind).unwrap();
        assert_eq!(out.get_pixel(50, 50)[3], 255, "{kind:?}");
        assert_eq!(out.get_pixel(5, 5)[3], 0, "{kind:?}");
    }
}

#[test]
fn uniform_image_is_fully_background_for_border_based_methods() {
    let engine = RemovalEngine::new();
    let img = RgbaImage::from_pixel(64, 48, Rgba([200, 180, 160, 255]));

    for method in [Method::White, Method::Color] {
        let out = engine.process(&img, method);
        assert!(out.pixels().all(|px| px[3] == 0), "{method}");
    }
}

#[test]
fn unrecognized_selector_falls_through_to_smart() {
    let engine = RemovalEngine::new();
    let img = red_square_on_blue();
    let smart = engine.process(&img, Method::Smart);
    let fallthrough = engine.process(&img, Method::parse("definitely-not-a-method"));
    assert_eq!(smart.as_raw(), fallthrough.as_raw());
}

#[test]
fn one_pixel_image_survives_every_method() {
    let engine = RemovalEngine::new();
    let img = RgbaImage::from_pixel(1, 1, Rgba([42, 42, 42, 255]));
    for method in [Method::Smart, Method::White, Method::Edge, Method::Color] {
        let out = engine.process(&img, method);
        assert_eq!(out.dimensions(), (1, 1), "{method}");
    }
}

#[test]
fn process_file_round_trips_through_png() {
    let engine = RemovalEngine::new();
    let input = temp_path("uniform.png");
    let output = temp_path("uniform_out.png");

    let img = RgbaImage::from_pixel(20, 20, Rgba([90, 90, 90, 255]));
    img.save(&input).unwrap();

    let opts = ProcessOptions {
        method: Method::White,
        ..ProcessOptions::default()
    };
    let result = engine.process_file(&input, &output, &opts);
    assert!(result.success, "{}", result.message);

    // Alpha survives the PNG round trip: a uniform image ends up transparent.
    let reloaded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(reloaded.dimensions(), (20, 20));
    assert!(reloaded.pixels().all(|px| px[3] == 0));

    std::fs::remove_file(&input).ok();
    std::fs::remove_file(&output).ok();
}

#[test]
fn process_file_reports_undecodable_input() {
    let engine = RemovalEngine::new();
    let input = temp_path("corrupt.png");
    let output = temp_path("corrupt_out.png");

    std::fs::write(&input, b"this is not an image").unwrap();

    let result = engine.process_file(&input, &output, &ProcessOptions::default());
    assert!(!result.success);
    assert!(result.message.contains("Failed to load"), "{}", result.message);
    assert!(!output.exists());

    std::fs::remove_file(&input).ok();
}
