//! Pixel codec collaborator: decode source bytes, encode to a target
//! container, and attach an opaque EXIF blob during encode.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage};
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::webp::WebP;
use img_parts::{Bytes, ImageEXIF};
use serde::Serialize;
use webp_animation::{
    Encoder as WebPAnimEncoder, EncoderOptions, EncodingConfig, EncodingType,
    LossyEncodingConfig,
};

use crate::error::{GeotagError, Result};
use crate::pipeline::OutputFormat;

/// Quality used when the caller leaves [`EncodeParams::quality`] unset.
pub const DEFAULT_QUALITY: u8 = 95;

/// Color mode of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    L8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    La16,
    Rgb16,
    Rgba16,
    Rgb32F,
    Rgba32F,
    Other,
}

impl ColorMode {
    pub fn of(image: &DynamicImage) -> Self {
        match image.color() {
            ColorType::L8 => Self::L8,
            ColorType::La8 => Self::La8,
            ColorType::Rgb8 => Self::Rgb8,
            ColorType::Rgba8 => Self::Rgba8,
            ColorType::L16 => Self::L16,
            ColorType::La16 => Self::La16,
            ColorType::Rgb16 => Self::Rgb16,
            ColorType::Rgba16 => Self::Rgba16,
            ColorType::Rgb32F => Self::Rgb32F,
            ColorType::Rgba32F => Self::Rgba32F,
            _ => Self::Other,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            Self::La8 | Self::Rgba8 | Self::La16 | Self::Rgba16 | Self::Rgba32F
        )
    }
}

/// Format-specific encoder settings.
///
/// `quality` applies to JPEG and lossy WebP. `optimize` builds optimized
/// Huffman tables for JPEG and selects maximum compression for PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub quality: Option<u8>,
    pub optimize: bool,
}

/// Source format, dimensions and color mode of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub color_mode: ColorMode,
}

/// Decode/encode backend used by the pipeline.
pub trait PixelCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage>;

    /// Encode `image` as `format`. When `exif` is given it is attached as
    /// the file's EXIF block (bare TIFF data, no `Exif\0\0` prefix).
    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        params: &EncodeParams,
        exif: Option<&[u8]>,
    ) -> Result<Vec<u8>>;
}

/// [`PixelCodec`] backed by the `image` crate, with EXIF attached through
/// `img-parts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl PixelCodec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes).map_err(|e| GeotagError::ImageDecode(e.to_string()))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        params: &EncodeParams,
        exif: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let quality = params.quality.unwrap_or(DEFAULT_QUALITY);

        let pixels = match format {
            OutputFormat::Jpeg => encode_jpeg(image, quality, params.optimize)?,
            OutputFormat::Png => {
                let compression = if params.optimize {
                    CompressionType::Best
                } else {
                    CompressionType::Default
                };
                let mut pixels = Vec::new();
                image
                    .write_with_encoder(PngEncoder::new_with_quality(
                        &mut pixels,
                        compression,
                        FilterType::Adaptive,
                    ))
                    .map_err(|e| GeotagError::Encode(format!("{format} encode failed: {e}")))?;
                pixels
            }
            OutputFormat::WebP => encode_webp(image, quality)?,
        };

        match exif {
            Some(blob) => attach_exif(pixels, format, blob),
            None => Ok(pixels),
        }
    }
}

/// Baseline JPEG, gray or RGB. Alpha must already be flattened.
fn encode_jpeg(image: &DynamicImage, quality: u8, optimize: bool) -> Result<Vec<u8>> {
    let too_large = || {
        GeotagError::Encode(format!(
            "JPEG encode failed: {}x{} exceeds 65535 pixels per side",
            image.width(),
            image.height()
        ))
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;

    let mut pixels = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut pixels, quality);
    encoder.set_optimized_huffman_tables(optimize);

    let written = match image {
        DynamicImage::ImageLuma8(gray) => {
            encoder.encode(gray.as_raw(), width, height, jpeg_encoder::ColorType::Luma)
        }
        other => encoder.encode(
            other.to_rgb8().as_raw(),
            width,
            height,
            jpeg_encoder::ColorType::Rgb,
        ),
    };
    written.map_err(|e| GeotagError::Encode(format!("JPEG encode failed: {e}")))?;
    Ok(pixels)
}

/// Lossy still WebP at `quality`, alpha kept.
fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let failed =
        |e: webp_animation::Error| GeotagError::Encode(format!("WebP encode failed: {e:?}"));
    let rgba = image.to_rgba8();
    let options = EncoderOptions {
        encoding_config: Some(EncodingConfig {
            encoding_type: EncodingType::Lossy(LossyEncodingConfig::default()),
            quality: f32::from(quality),
            ..Default::default()
        }),
        ..Default::default()
    };

    // A single frame is written as a still image.
    let mut encoder =
        WebPAnimEncoder::new_with_options(rgba.dimensions(), options).map_err(failed)?;
    encoder.add_frame(rgba.as_raw(), 0).map_err(failed)?;
    let data = encoder.finalize(0).map_err(failed)?;
    Ok(data.to_vec())
}

/// Insert `blob` as the EXIF block of an already encoded file.
pub(crate) fn attach_exif(encoded: Vec<u8>, format: OutputFormat, blob: &[u8]) -> Result<Vec<u8>> {
    let data = Bytes::from(encoded);
    let exif = Some(Bytes::copy_from_slice(blob));
    let mut output = Vec::new();

    let written = match format {
        OutputFormat::Jpeg => {
            let mut jpeg = Jpeg::from_bytes(data).map_err(|e| container_error(format, e))?;
            jpeg.set_exif(exif);
            jpeg.encoder().write_to(&mut output)
        }
        OutputFormat::WebP => {
            let mut webp = WebP::from_bytes(data).map_err(|e| container_error(format, e))?;
            webp.set_exif(exif);
            webp.encoder().write_to(&mut output)
        }
        OutputFormat::Png => {
            let mut png = Png::from_bytes(data).map_err(|e| container_error(format, e))?;
            png.set_exif(exif);
            png.encoder().write_to(&mut output)
        }
    };

    written.map_err(|e| GeotagError::Encode(format!("failed to write {format}: {e}")))?;
    log::debug!("Attached {} byte EXIF block to {format}", blob.len());
    Ok(output)
}

fn container_error(format: OutputFormat, e: img_parts::Error) -> GeotagError {
    GeotagError::Encode(format!("failed to parse encoded {format}: {e}"))
}

/// Report source format, dimensions and color mode.
pub fn image_info(bytes: &[u8]) -> Result<ImageInfo> {
    let format =
        image::guess_format(bytes).map_err(|e| GeotagError::ImageDecode(e.to_string()))?;
    let image = ImageCodec.decode(bytes)?;

    Ok(ImageInfo {
        mime_type: format.to_mime_type(),
        width: image.width(),
        height: image.height(),
        color_mode: ColorMode::of(&image),
    })
}
