//! Shrinks user uploads before they reach blob storage.

use super::MediaError;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use tracing::debug;

const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Decode, fit inside `max_edge` x `max_edge`, and re-encode. Images with an
/// alpha channel stay PNG so stripped backgrounds survive; the rest become JPEG.
pub fn prepare_upload(raw: &[u8], max_edge: u32) -> Result<PreparedImage, MediaError> {
    let img = image::load_from_memory(raw).map_err(MediaError::Decode)?;
    let (width, height) = img.dimensions();

    let img = if width.max(height) > max_edge {
        img.resize(max_edge, max_edge, FilterType::Lanczos3)
    } else {
        img
    };

    let prepared = if img.color().has_alpha() {
        encode_png(&img)?
    } else {
        encode_jpeg(&img)?
    };
    debug!(
        from = raw.len(),
        to = prepared.bytes.len(),
        width = prepared.width,
        height = prepared.height,
        "upload prepared"
    );
    Ok(prepared)
}

fn encode_png(img: &DynamicImage) -> Result<PreparedImage, MediaError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(MediaError::Encode)?;
    Ok(PreparedImage {
        bytes: Bytes::from(buf.into_inner()),
        content_type: "image/png",
        extension: "png",
        width: img.width(),
        height: img.height(),
    })
}

fn encode_jpeg(img: &DynamicImage) -> Result<PreparedImage, MediaError> {
    let mut buf = Vec::new();
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))
        .map_err(MediaError::Encode)?;
    Ok(PreparedImage {
        bytes: Bytes::from(buf),
        content_type: "image/jpeg",
        extension: "jpg",
        width: img.width(),
        height: img.height(),
    })
}
