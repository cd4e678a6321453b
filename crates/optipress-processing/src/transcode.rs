//! Transcode engine: decode validated source bytes, re-encode at the
//! requested format and quality.
//!
//! Pixel codec work is delegated to the codec stack (mozjpeg, webp, ravif,
//! image); this module owns orchestration, parameter checking, and the
//! error contract. Same inputs always produce byte-identical output for a
//! deterministic codec backend.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use optipress_core::{OptimizationResult, OutputFormat, TranscodeError};
use std::io::Cursor;

/// Transcode `source` into `target` at `quality` (0-100).
///
/// Quality is only meaningful for the lossy targets (jpeg, webp, avif).
/// For png it is accepted and ignored: png is lossless and the callers
/// always supply a quality value regardless of target.
pub fn transcode(
    source: &[u8],
    target: OutputFormat,
    quality: u8,
) -> Result<OptimizationResult, TranscodeError> {
    if quality > 100 {
        return Err(TranscodeError::InvalidParameters { quality });
    }

    let img = decode(source)?;
    let (width, height) = img.dimensions();

    let encoded = match target {
        OutputFormat::Jpeg => encode_jpeg(&img, quality),
        OutputFormat::Png => encode_png(&img),
        OutputFormat::WebP => encode_webp(&img, quality),
        OutputFormat::Avif => encode_avif(&img, quality),
    }
    .map_err(|source| TranscodeError::EncodeFailure {
        format: target.as_str(),
        source,
    })?;

    tracing::debug!(
        target = target.as_str(),
        quality = quality,
        input_bytes = source.len(),
        output_bytes = encoded.len(),
        "Transcoded image"
    );

    let size_bytes = encoded.len() as u64;
    Ok(OptimizationResult {
        bytes: encoded,
        width_px: width,
        height_px: height,
        size_bytes,
        format: target.as_tag(),
    })
}

fn decode(source: &[u8]) -> Result<DynamicImage, TranscodeError> {
    ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| TranscodeError::UnsupportedSource(e.to_string()))?
        .decode()
        .map_err(|e| TranscodeError::UnsupportedSource(e.to_string()))
}

/// Encode to JPEG using mozjpeg (progressive, optimized coding).
fn encode_jpeg(img: &DynamicImage, quality: u8) -> anyhow::Result<Bytes> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp.start_compress(Vec::new())?;
    comp.write_scanlines(&rgb_img)?;
    let jpeg_data = comp.finish()?;

    Ok(Bytes::from(jpeg_data))
}

/// Encode to PNG. Lossless; no quality parameter.
fn encode_png(img: &DynamicImage) -> anyhow::Result<Bytes> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);

    img.write_to(&mut cursor, ImageFormat::Png)?;

    Ok(Bytes::from(buffer))
}

/// Encode to WebP.
fn encode_webp(img: &DynamicImage, quality: u8) -> anyhow::Result<Bytes> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(quality as f32);

    Ok(Bytes::copy_from_slice(&webp_data))
}

/// Encode to AVIF.
fn encode_avif(img: &DynamicImage, quality: u8) -> anyhow::Result<Bytes> {
    let (width, height) = img.dimensions();
    let rgb_img = img.to_rgb8();
    let raw_pixels = rgb_img.as_raw();

    let rgb_data: Vec<rgb::RGB8> = raw_pixels
        .chunks_exact(3)
        .map(|chunk| rgb::RGB8::new(chunk[0], chunk[1], chunk[2]))
        .collect();

    let img_buf = ravif::Img::new(rgb_data.as_slice(), width as usize, height as usize);

    let encoder = ravif::Encoder::new()
        .with_quality(quality as f32)
        .with_speed(6);

    let avif_data = encoder.encode_rgb(img_buf)?;

    Ok(Bytes::copy_from_slice(&avif_data.avif_file))
}
