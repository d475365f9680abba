//! End-to-end resizes through the real `image` crate backend.
//!
//! Every test writes synthetic JPEG/PNG/GIF sources into a temp directory,
//! runs [`Resizer::resize_image`], and decodes the written output to check
//! dimensions and format.

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Frame, ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use image_resizer::config::ResizerConfig;
use image_resizer::imaging::{
    CropMode, OutputFormat, ResizeError, ResizeOptions, ResizeOutcome, Resizer,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    JpegEncoder::new_with_quality(std::io::BufWriter::new(file), 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| {
        Rgba([30, 160, 90, if x < width / 2 { 0 } else { 255 }])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

fn write_gif(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_pixel(width, height, Rgba([240, 200, 10, 255]));
    let mut encoder = GifEncoder::new(fs::File::create(path).unwrap());
    encoder.encode_frame(Frame::new(img)).unwrap();
}

fn output_info(path: &Path) -> (ImageFormat, u32, u32) {
    let bytes = fs::read(path).unwrap();
    let format = image::guess_format(&bytes).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    (format, img.width(), img.height())
}

fn with_output(output: &Path) -> ResizeOptions {
    ResizeOptions {
        output: Some(output.to_path_buf()),
        ..Default::default()
    }
}

fn setup(name: &str, writer: fn(&Path, u32, u32), w: u32, h: u32) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    writer(&path, w, h);
    (tmp, path)
}

#[test]
fn jpeg_fits_inside_default_box() {
    let (tmp, source) = setup("wide.jpg", write_jpeg, 800, 400);
    let output = tmp.path().join("out.jpg");

    let outcome = Resizer::default()
        .resize_image(&source, &with_output(&output))
        .unwrap();

    let ResizeOutcome::Resized(report) = outcome else {
        panic!("expected resize, got {outcome:?}");
    };
    assert_eq!(report.format, OutputFormat::Jpeg);
    // 800 → 200 wide: f = 187.5 → strength round(16.497) = 16
    assert_eq!(report.sharpen_strength, Some(16.0));
    assert_eq!(output_info(&output), (ImageFormat::Jpeg, 200, 100));
}

#[test]
fn portrait_jpeg_is_height_driven() {
    let (tmp, source) = setup("tall.jpg", write_jpeg, 256, 1024);
    let output = tmp.path().join("out.jpg");

    Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                max_width: Some(128),
                max_height: Some(128),
                ..with_output(&output)
            },
        )
        .unwrap();

    assert_eq!(output_info(&output), (ImageFormat::Jpeg, 32, 128));
}

#[test]
fn small_image_copied_byte_identical() {
    let (tmp, source) = setup("small.jpg", write_jpeg, 150, 90);
    let output = tmp.path().join("copy.jpg");

    let outcome = Resizer::default()
        .resize_image(&source, &with_output(&output))
        .unwrap();

    assert!(matches!(outcome, ResizeOutcome::Copied { .. }));
    assert_eq!(fs::read(&source).unwrap(), fs::read(&output).unwrap());
}

#[test]
fn keep_small_upscales_instead_of_copying() {
    let (tmp, source) = setup("small.png", write_png, 50, 25);
    let output = tmp.path().join("big.png");

    Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                ignore_small_images: Some(false),
                ..with_output(&output)
            },
        )
        .unwrap();

    assert_eq!(output_info(&output), (ImageFormat::Png, 200, 100));
}

#[test]
fn zoom_crop_fills_the_box() {
    let (tmp, source) = setup("landscape.jpg", write_jpeg, 800, 600);
    let output = tmp.path().join("square.jpg");

    let outcome = Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                max_width: Some(400),
                max_height: Some(400),
                crop: Some(CropMode::Zoom),
                ..with_output(&output)
            },
        )
        .unwrap();

    let ResizeOutcome::Resized(report) = outcome else {
        panic!("expected resize");
    };
    assert_eq!(report.geometry.crop.offset_x, 100.0);
    assert_eq!(report.geometry.crop.width, 600.0);
    assert_eq!(output_info(&output), (ImageFormat::Jpeg, 400, 400));
}

#[test]
fn ratio_crop_then_fit() {
    let (tmp, source) = setup("pano.jpg", write_jpeg, 1000, 500);
    let output = tmp.path().join("square.jpg");

    Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                crop: Some(CropMode::Ratio("1:1".parse().unwrap())),
                ..with_output(&output)
            },
        )
        .unwrap();

    assert_eq!(output_info(&output), (ImageFormat::Jpeg, 200, 200));
}

#[test]
fn gif_is_written_as_png_with_transparency_kept() {
    let (tmp, source) = setup("banner.gif", write_gif, 800, 400);
    let output = tmp.path().join("banner.png");

    let outcome = Resizer::default()
        .resize_image(&source, &with_output(&output))
        .unwrap();

    let ResizeOutcome::Resized(report) = outcome else {
        panic!("expected resize");
    };
    assert_eq!(report.format, OutputFormat::Png);
    assert_eq!(report.sharpen_strength, None);
    assert_eq!(output_info(&output), (ImageFormat::Png, 200, 100));
}

#[test]
fn png_alpha_survives_resize() {
    let (tmp, source) = setup("alpha.png", write_png, 400, 200);
    let output = tmp.path().join("alpha-small.png");

    Resizer::default()
        .resize_image(&source, &with_output(&output))
        .unwrap();

    let img = image::open(&output).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (200, 100));
    assert_eq!(img.get_pixel(5, 50)[3], 0);
    assert_eq!(img.get_pixel(195, 50)[3], 255);
}

#[test]
fn in_place_resize_converges() {
    let (_tmp, source) = setup("photo.jpg", write_jpeg, 900, 600);
    let resizer = Resizer::default();

    let first = resizer
        .resize_image(&source, &ResizeOptions::default())
        .unwrap();
    assert!(matches!(first, ResizeOutcome::Resized(_)));
    let after_first = fs::read(&source).unwrap();

    let second = resizer
        .resize_image(&source, &ResizeOptions::default())
        .unwrap();
    assert!(matches!(second, ResizeOutcome::Copied { .. }));
    assert_eq!(fs::read(&source).unwrap(), after_first);
    assert_eq!(output_info(&source), (ImageFormat::Jpeg, 200, 134));
}

#[test]
fn config_defaults_drive_the_resize() {
    let (tmp, source) = setup("config.jpg", write_jpeg, 1000, 1000);
    let output = tmp.path().join("out.jpg");
    let mut config = ResizerConfig::default();
    config.resize.max_width = 64;
    config.resize.max_height = 32;
    config.resize.crop_zoom = true;

    Resizer::new(config)
        .resize_image(&source, &with_output(&output))
        .unwrap();

    assert_eq!(output_info(&output), (ImageFormat::Jpeg, 64, 32));
}

#[test]
fn text_file_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("readme.jpg");
    fs::write(&source, "not an image at all").unwrap();

    let err = Resizer::default()
        .resize_image(&source, &ResizeOptions::default())
        .unwrap_err();
    assert!(matches!(err, ResizeError::UnsupportedFormat { .. }));
}

#[test]
fn missing_source_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let err = Resizer::default()
        .resize_image(&tmp.path().join("gone.jpg"), &ResizeOptions::default())
        .unwrap_err();
    assert!(matches!(err, ResizeError::SourceNotFound(_)));
}

#[test]
fn decode_budget_rejects_before_writing() {
    let (tmp, source) = setup("budget.jpg", write_jpeg, 640, 480);
    let output = tmp.path().join("out.jpg");

    let err = Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                max_decode_bytes: Some(10_000),
                ..with_output(&output)
            },
        )
        .unwrap_err();

    assert!(matches!(err, ResizeError::BudgetExceeded { .. }));
    assert!(!output.exists());
}

#[test]
fn delete_source_moves_the_image() {
    let (tmp, source) = setup("move.jpg", write_jpeg, 500, 500);
    let output = tmp.path().join("moved.jpg");

    let outcome = Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                delete_source: Some(true),
                ..with_output(&output)
            },
        )
        .unwrap();

    assert!(outcome.succeeded());
    assert!(!source.exists());
    assert_eq!(output_info(&output), (ImageFormat::Jpeg, 200, 200));
}

#[test]
fn output_spelled_through_parent_dir_never_loses_the_source() {
    let (tmp, source) = setup("photo.jpg", write_jpeg, 100, 80);
    fs::create_dir(tmp.path().join("d")).unwrap();
    let before = fs::read(&source).unwrap();

    let outcome = Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                delete_source: Some(true),
                ..with_output(&tmp.path().join("d/../photo.jpg"))
            },
        )
        .unwrap();
    assert!(matches!(outcome, ResizeOutcome::Copied { .. }));
    assert_eq!(fs::read(&source).unwrap(), before);

    let outcome = Resizer::default()
        .resize_image(
            &source,
            &ResizeOptions {
                max_width: Some(50),
                delete_source: Some(true),
                ..with_output(&tmp.path().join("d/../photo.jpg"))
            },
        )
        .unwrap();
    let ResizeOutcome::Resized(report) = outcome else {
        panic!("expected resize, got {outcome:?}");
    };
    assert!(!report.source_deleted);
    assert_eq!(output_info(&source), (ImageFormat::Jpeg, 50, 40));
}
