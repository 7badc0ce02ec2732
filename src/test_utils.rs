//! In-memory image fixtures for unit tests.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

use crate::codec::attach_exif;
use crate::pipeline::OutputFormat;

/// Opaque RGB gradient.
pub(crate) fn rgb_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 16) as u8, (y * 16) as u8, 128])
    }))
}

/// RGBA gradient with partially transparent pixels (alpha never zero).
pub(crate) fn rgba_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 16) as u8, (y * 16) as u8, 200, 64 + ((x + y) * 8 % 192) as u8])
    }))
}

/// Encode with the `image` crate's default settings.
pub(crate) fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, format).unwrap();
    cursor.into_inner()
}

/// Attach a raw EXIF blob to already encoded bytes.
pub(crate) fn with_exif(encoded: Vec<u8>, format: ImageFormat, blob: &[u8]) -> Vec<u8> {
    let target = match format {
        ImageFormat::Jpeg => OutputFormat::Jpeg,
        ImageFormat::Png => OutputFormat::Png,
        ImageFormat::WebP => OutputFormat::WebP,
        other => panic!("no EXIF support for {other:?}"),
    };
    attach_exif(encoded, target, blob).unwrap()
}
