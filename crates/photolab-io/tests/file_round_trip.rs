//! Integration test: save edited images to disk and load them back.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use photolab_io::{IoError, load_image, save_image};
use photolab_pipeline::{FilterParameters, PipelineError, RgbImage, Session};

/// Fresh scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("photolab-io-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn checker() -> RgbImage {
    RgbImage::from_fn(20, 10, |x, y| {
        if (x / 5 + y / 5) % 2 == 0 {
            image::Rgb([230, 210, 40])
        } else {
            image::Rgb([20, 60, 180])
        }
    })
}

#[test]
fn png_and_bmp_survive_disk_round_trip() {
    let dir = scratch_dir("lossless");
    for name in ["checker.png", "checker.BMP"] {
        let written = save_image(&checker(), &dir.join(name)).unwrap();
        assert_eq!(written, dir.join(name));
        assert_eq!(load_image(&written).unwrap(), checker());
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn jpeg_written_when_extension_missing() {
    let dir = scratch_dir("default-ext");
    let written = save_image(&checker(), &dir.join("edited")).unwrap();
    assert_eq!(written, dir.join("edited.jpg"));
    let back = load_image(&written).unwrap();
    assert_eq!(back.dimensions(), (20, 10));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unsupported_extension_writes_nothing() {
    let dir = scratch_dir("unsupported");
    let target = dir.join("edited.tiff");
    let err = save_image(&checker(), &target).unwrap_err();
    assert!(matches!(
        err,
        IoError::Pipeline(PipelineError::UnsupportedFormat(_))
    ));
    assert!(!target.exists());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let dir = scratch_dir("missing");
    let err = load_image(&dir.join("nope.png")).unwrap_err();
    assert!(matches!(err, IoError::Io { .. }));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn non_image_file_is_decode_error() {
    let dir = scratch_dir("garbage");
    let path = dir.join("notes.png");
    std::fs::write(&path, b"shopping list").unwrap();
    let err = load_image(&path).unwrap_err();
    assert!(matches!(
        err,
        IoError::Pipeline(PipelineError::ImageDecode(_))
    ));

    let empty = dir.join("empty.png");
    std::fs::write(&empty, b"").unwrap();
    assert!(matches!(
        load_image(&empty).unwrap_err(),
        IoError::Pipeline(PipelineError::EmptyInput)
    ));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn edited_session_saves_display_image() {
    let dir = scratch_dir("session");
    let source = dir.join("source.png");
    save_image(&checker(), &source).unwrap();

    let mut session = Session::new();
    session.load(load_image(&source).unwrap()).unwrap();
    session
        .set_parameters(FilterParameters {
            brightness: -40.0,
            grayscale: true,
            ..FilterParameters::default()
        })
        .unwrap();

    let out = save_image(session.display().unwrap(), &dir.join("out.png")).unwrap();
    assert_eq!(&load_image(&out).unwrap(), session.display().unwrap());
    std::fs::remove_dir_all(&dir).unwrap();
}
