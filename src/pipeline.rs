use image::{DynamicImage, Rgb, RgbImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use walkdir::WalkDir;

use crate::codec::{ColorMode, EncodeParams, ImageCodec, PixelCodec};
use crate::config::EncodingConfig;
use crate::error::{GeotagError, Result};
use crate::exif::MetadataContainer;
use crate::gps::Coordinate;

/// Extensions picked up when walking input paths.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Target container of the re-encoding pipeline.
///
/// Parsing is case- and whitespace-insensitive; `jpg` and `jpeg` both name
/// the JPEG family.
///
/// # Example
///
/// ```rust
/// use geotag::pipeline::OutputFormat;
///
/// assert_eq!(OutputFormat::parse(" JPG ").unwrap(), OutputFormat::Jpeg);
/// assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
/// assert!(OutputFormat::parse("bmp").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Normalize a requested format name.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            _ => Err(GeotagError::UnsupportedFormat(trimmed.to_string())),
        }
    }

    /// Determine the format from a file path extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::parse(ext).ok()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Whether the pipeline attaches GPS metadata to this format. PNG output
    /// never carries coordinates.
    pub fn embeds_gps(&self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    pub fn supports_alpha(&self) -> bool {
        matches!(self, Self::Png | Self::WebP)
    }
}

impl FromStr for OutputFormat {
    type Err = GeotagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
        };
        f.write_str(name)
    }
}

/// Convert `image` into a color mode the target encoder accepts.
///
/// * JPEG: any alpha is flattened onto opaque white, using alpha as the
///   blend mask. Other non-RGB/gray modes become RGB.
/// * PNG/WebP: 8-bit gray, RGB and RGBA pass through; anything else becomes
///   RGBA.
///
/// Palette images arrive here already expanded by the decoder.
pub fn normalize_color_mode(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    let mode = ColorMode::of(&image);

    if format.supports_alpha() {
        return match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => image,
            other => {
                log::debug!("Converting {mode:?} to Rgba8 for {format}");
                DynamicImage::ImageRgba8(other.to_rgba8())
            }
        };
    }

    if mode.has_alpha() {
        log::debug!("Flattening {mode:?} onto white for {format}");
        return DynamicImage::ImageRgb8(flatten_onto_white(&image));
    }

    match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        other => {
            log::debug!("Converting {mode:?} to Rgb8 for {format}");
            DynamicImage::ImageRgb8(other.to_rgb8())
        }
    }
}

fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Outcome of the metadata embed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embedding {
    /// Coordinates were written into the output.
    Embedded,
    /// The target format does not carry coordinates (PNG).
    Skipped,
    /// The embed pass failed; the output is the unembedded first-pass image.
    FellBack(String),
}

impl Embedding {
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded)
    }
}

/// A fully formed output image.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub format: OutputFormat,
    pub embedding: Embedding,
}

/// Re-encodes images into a target format with GPS coordinates attached.
///
/// Each call is independent; a processor can be shared across threads.
///
/// # Example
///
/// ```rust,no_run
/// use geotag::config::EncodingConfig;
/// use geotag::pipeline::{Embedding, ImageProcessor};
///
/// # fn example() -> geotag::Result<()> {
/// let processor = ImageProcessor::new(EncodingConfig::default());
/// let source = std::fs::read("photo.png").unwrap();
/// let output = processor.process(&source, 48.8584, 2.2945, "jpeg")?;
///
/// assert_eq!(output.mime_type, "image/jpeg");
/// if let Embedding::FellBack(reason) = &output.embedding {
///     eprintln!("saved without coordinates: {reason}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImageProcessor<C: PixelCodec = ImageCodec> {
    codec: C,
    encoding: EncodingConfig,
}

impl ImageProcessor<ImageCodec> {
    pub fn new(encoding: EncodingConfig) -> Self {
        Self::with_codec(ImageCodec, encoding)
    }
}

impl Default for ImageProcessor<ImageCodec> {
    fn default() -> Self {
        Self::new(EncodingConfig::default())
    }
}

impl<C: PixelCodec> ImageProcessor<C> {
    pub fn with_codec(codec: C, encoding: EncodingConfig) -> Self {
        Self { codec, encoding }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Validate `format_name`, then re-encode with coordinates attached.
    ///
    /// Fails with [`GeotagError::UnsupportedFormat`] before touching the
    /// pixels, with [`GeotagError::ImageDecode`] when the source cannot be
    /// decoded, or with [`GeotagError::Encode`] when the first encode pass
    /// fails. A failed embed pass is not an error; see [`Embedding`].
    pub fn process(
        &self,
        image_bytes: &[u8],
        latitude: f64,
        longitude: f64,
        format_name: &str,
    ) -> Result<ProcessedImage> {
        let format = OutputFormat::parse(format_name)?;
        self.process_as(image_bytes, latitude, longitude, format)
    }

    /// Like [`process`](Self::process) with an already validated format.
    pub fn process_as(
        &self,
        image_bytes: &[u8],
        latitude: f64,
        longitude: f64,
        format: OutputFormat,
    ) -> Result<ProcessedImage> {
        let decoded = self.codec.decode(image_bytes)?;
        log::debug!(
            "Decoded {}x{} {:?} image",
            decoded.width(),
            decoded.height(),
            ColorMode::of(&decoded)
        );

        let image = normalize_color_mode(decoded, format);
        let params = self.encoding.params_for(format);
        let fallback = self.codec.encode(&image, format, &params, None)?;

        let (bytes, embedding) = if !format.embeds_gps() {
            (fallback, Embedding::Skipped)
        } else {
            match self.embed_gps(&image, format, &params, latitude, longitude) {
                Ok(bytes) => (bytes, Embedding::Embedded),
                Err(e) => {
                    log::warn!("GPS embedding failed, returning image without coordinates: {e}");
                    (fallback, Embedding::FellBack(e.to_string()))
                }
            }
        };

        Ok(ProcessedImage {
            bytes,
            mime_type: format.mime_type(),
            format,
            embedding,
        })
    }

    fn embed_gps(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        params: &EncodeParams,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<u8>> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let blob = MetadataContainer::for_coordinate(&coordinate).to_tiff_bytes()?;
        self.codec.encode(image, format, params, Some(&blob))
    }
}

/// Re-encode `image_bytes` as `format_name` with default encoder settings.
pub fn process_image(
    image_bytes: &[u8],
    latitude: f64,
    longitude: f64,
    format_name: &str,
) -> Result<ProcessedImage> {
    ImageProcessor::default().process(image_bytes, latitude, longitude, format_name)
}

/// Collect all supported image files from a list of paths (files or directories).
///
/// Directories are walked recursively. Unsupported files are skipped with a
/// warning.
///
/// # Example
///
/// ```rust,no_run
/// use geotag::pipeline::collect_images;
/// use std::path::PathBuf;
///
/// let images = collect_images(&[
///     PathBuf::from("photo.jpg"),       // single file
///     PathBuf::from("./photos/"),        // entire directory
/// ]);
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_supported_image(path) {
                images.push(path.clone());
            } else {
                log::warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && is_supported_image(p) {
                    images.push(p.to_path_buf());
                }
            }
        } else {
            log::warn!("Path does not exist: {}", path.display());
        }
    }

    images
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Output file name for `source` re-encoded as `format`:
/// `<stem><suffix>.<extension>`.
pub fn output_file_name(source: &Path, format: OutputFormat, suffix: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{stem}{suffix}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::read_coordinates;
    use crate::test_utils::{encode, rgb_image, rgba_image};
    use image::{ImageFormat, LumaA, Rgba, RgbaImage};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Wraps [`ImageCodec`], counting decodes and optionally failing passes.
    #[derive(Default)]
    struct ScriptedCodec {
        decodes: AtomicUsize,
        fail_embed: bool,
        fail_all_encodes: bool,
    }

    impl PixelCodec for ScriptedCodec {
        fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            ImageCodec.decode(bytes)
        }

        fn encode(
            &self,
            image: &DynamicImage,
            format: OutputFormat,
            params: &EncodeParams,
            exif: Option<&[u8]>,
        ) -> Result<Vec<u8>> {
            if self.fail_all_encodes || (self.fail_embed && exif.is_some()) {
                return Err(GeotagError::Encode("scripted failure".into()));
            }
            ImageCodec.encode(image, format, params, exif)
        }
    }

    fn png_source() -> Vec<u8> {
        encode(&rgba_image(16, 16), ImageFormat::Png)
    }

    /// 16x16 palette PNG: left half opaque red, right half a fully
    /// transparent blue palette entry.
    fn palette_png_with_transparency() -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 16, 16);
            encoder.set_color(png::ColorType::Indexed);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
            encoder.set_trns(vec![255, 0]);
            let mut writer = encoder.write_header().unwrap();
            let indices: Vec<u8> = (0..16 * 16).map(|i| u8::from(i % 16 >= 8)).collect();
            writer.write_image_data(&indices).unwrap();
            writer.finish().unwrap();
        }
        bytes
    }

    /// What the first encode pass produces for `source`.
    fn first_pass(source: &[u8], format: OutputFormat) -> Vec<u8> {
        let image = normalize_color_mode(ImageCodec.decode(source).unwrap(), format);
        let params = EncodingConfig::default().params_for(format);
        ImageCodec.encode(&image, format, &params, None).unwrap()
    }

    // ── OutputFormat ─────────────────────────────────────────────────

    #[test]
    fn parse_is_case_and_whitespace_insensitive() {
        assert_eq!(OutputFormat::parse("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse(" JPG\n").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("Png").unwrap(), OutputFormat::Png);
        assert_eq!("WEBP".parse::<OutputFormat>().unwrap(), OutputFormat::WebP);
    }

    #[test]
    fn parse_rejects_unsupported() {
        for name in ["bmp", "gif", "", "jpe g", "tiff"] {
            assert!(
                matches!(OutputFormat::parse(name), Err(GeotagError::UnsupportedFormat(_))),
                "{name:?}"
            );
        }
    }

    #[test]
    fn unsupported_message_lists_supported_formats() {
        let err = OutputFormat::parse(" BMP ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported format: BMP. Supported formats: jpeg, jpg, png, webp"
        );
    }

    #[test]
    fn mime_types() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::WebP.mime_type(), "image/webp");
    }

    #[test]
    fn format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.JPG")), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_path(Path::new("x.webp")), Some(OutputFormat::WebP));
        assert_eq!(OutputFormat::from_path(Path::new("x.heic")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn only_jpeg_and_webp_embed() {
        assert!(OutputFormat::Jpeg.embeds_gps());
        assert!(OutputFormat::WebP.embeds_gps());
        assert!(!OutputFormat::Png.embeds_gps());
    }

    // ── normalize_color_mode ─────────────────────────────────────────

    #[test]
    fn jpeg_flattens_alpha_onto_white() {
        let mut rgba = RgbaImage::new(3, 1);
        rgba.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        rgba.put_pixel(2, 0, Rgba([0, 0, 0, 128]));

        let out = normalize_color_mode(DynamicImage::ImageRgba8(rgba), OutputFormat::Jpeg);
        let rgb = out.as_rgb8().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(2, 0).0, [127, 127, 127]);
    }

    #[test]
    fn jpeg_flattens_gray_alpha() {
        let mut la = image::GrayAlphaImage::new(1, 1);
        la.put_pixel(0, 0, LumaA([0, 0]));
        let out = normalize_color_mode(DynamicImage::ImageLumaA8(la), OutputFormat::Jpeg);
        assert_eq!(out.as_rgb8().unwrap().get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn palette_transparency_flattens_to_white() {
        let decoded = ImageCodec.decode(&palette_png_with_transparency()).unwrap();
        assert_eq!(ColorMode::of(&decoded), ColorMode::Rgba8);

        let out = normalize_color_mode(decoded, OutputFormat::Jpeg);
        let rgb = out.as_rgb8().unwrap();
        assert_eq!(rgb.get_pixel(2, 5).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(12, 5).0, [255, 255, 255]);
    }

    #[test]
    fn jpeg_keeps_rgb_and_gray() {
        let rgb = normalize_color_mode(rgb_image(2, 2), OutputFormat::Jpeg);
        assert_eq!(ColorMode::of(&rgb), ColorMode::Rgb8);
        let gray = normalize_color_mode(DynamicImage::new_luma8(2, 2), OutputFormat::Jpeg);
        assert_eq!(ColorMode::of(&gray), ColorMode::L8);
    }

    #[test]
    fn jpeg_converts_wide_modes_to_rgb() {
        let out = normalize_color_mode(DynamicImage::new_rgb16(2, 2), OutputFormat::Jpeg);
        assert_eq!(ColorMode::of(&out), ColorMode::Rgb8);
    }

    #[test]
    fn alpha_targets_keep_compatible_modes() {
        for format in [OutputFormat::Png, OutputFormat::WebP] {
            let out = normalize_color_mode(rgba_image(2, 2), format);
            assert_eq!(out, rgba_image(2, 2));
            let out = normalize_color_mode(rgb_image(2, 2), format);
            assert_eq!(ColorMode::of(&out), ColorMode::Rgb8);
        }
    }

    #[test]
    fn alpha_targets_convert_wide_modes_to_rgba() {
        let out = normalize_color_mode(DynamicImage::new_rgba16(2, 2), OutputFormat::Png);
        assert_eq!(ColorMode::of(&out), ColorMode::Rgba8);
        let out = normalize_color_mode(DynamicImage::new_rgb32f(2, 2), OutputFormat::WebP);
        assert_eq!(ColorMode::of(&out), ColorMode::Rgba8);
    }

    // ── process ──────────────────────────────────────────────────────

    #[test]
    fn unsupported_format_fails_before_decode() {
        let processor = ImageProcessor::with_codec(ScriptedCodec::default(), EncodingConfig::default());
        let result = processor.process(&png_source(), 0.0, 0.0, "bmp");
        assert!(matches!(result, Err(GeotagError::UnsupportedFormat(_))));
        assert_eq!(processor.codec().decodes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn undecodable_source_is_an_error() {
        let result = process_image(b"not an image", 0.0, 0.0, "jpeg");
        assert!(matches!(result, Err(GeotagError::ImageDecode(_))));
    }

    #[test]
    fn jpeg_output_carries_coordinates() {
        let output = process_image(&png_source(), 48.8584, 2.2945, "jpg").unwrap();
        assert_eq!(output.mime_type, "image/jpeg");
        assert_eq!(output.embedding, Embedding::Embedded);

        let back = read_coordinates(&output.bytes).unwrap().unwrap();
        assert!((back.latitude() - 48.8584).abs() < 1e-7);
        assert!((back.longitude() - 2.2945).abs() < 1e-7);
    }

    #[test]
    fn palette_png_with_transparency_becomes_white_jpeg() {
        let output = process_image(&palette_png_with_transparency(), 1.0, 2.0, "jpeg").unwrap();
        assert_eq!(output.embedding, Embedding::Embedded);

        let decoded = image::load_from_memory(&output.bytes).unwrap().to_rgb8();
        for y in [2, 8, 13] {
            let [r, g, b] = decoded.get_pixel(13, y).0;
            assert!(r >= 245 && g >= 245 && b >= 245, "({r},{g},{b}) at row {y}");
            let [r, g, b] = decoded.get_pixel(2, y).0;
            assert!(r >= 200 && g <= 60 && b <= 60, "({r},{g},{b}) at row {y}");
        }
    }

    #[test]
    fn webp_output_carries_coordinates() {
        let output = process_image(&png_source(), -33.8568, 151.2153, "webp").unwrap();
        assert_eq!(output.mime_type, "image/webp");
        assert!(output.embedding.is_embedded());

        let back = read_coordinates(&output.bytes).unwrap().unwrap();
        assert!((back.latitude() + 33.8568).abs() < 1e-7);
        assert!((back.longitude() - 151.2153).abs() < 1e-7);
    }

    #[test]
    fn png_never_embeds() {
        let source = encode(&rgb_image(8, 8), ImageFormat::Jpeg);
        let output = process_image(&source, 1.0, 1.0, "png").unwrap();
        assert_eq!(output.mime_type, "image/png");
        assert_eq!(output.embedding, Embedding::Skipped);
        assert!(read_coordinates(&output.bytes).unwrap().is_none());
        assert_eq!(output.bytes, first_pass(&source, OutputFormat::Png));
    }

    #[test]
    fn invalid_coordinate_falls_back_to_first_pass() {
        let source = png_source();
        let output = process_image(&source, f64::NAN, 0.0, "jpeg").unwrap();

        assert!(matches!(output.embedding, Embedding::FellBack(_)));
        assert_eq!(output.bytes, first_pass(&source, OutputFormat::Jpeg));
        assert!(read_coordinates(&output.bytes).unwrap().is_none());
    }

    #[test]
    fn codec_embed_failure_falls_back_to_first_pass() {
        let codec = ScriptedCodec {
            fail_embed: true,
            ..ScriptedCodec::default()
        };
        let processor = ImageProcessor::with_codec(codec, EncodingConfig::default());
        let source = png_source();

        let output = processor.process(&source, 10.0, 20.0, "webp").unwrap();
        assert_eq!(
            output.embedding,
            Embedding::FellBack("could not encode image: scripted failure".into())
        );
        assert_eq!(output.bytes, first_pass(&source, OutputFormat::WebP));
    }

    #[test]
    fn first_pass_failure_is_fatal() {
        let codec = ScriptedCodec {
            fail_all_encodes: true,
            ..ScriptedCodec::default()
        };
        let processor = ImageProcessor::with_codec(codec, EncodingConfig::default());
        let result = processor.process(&png_source(), 10.0, 20.0, "jpeg");
        assert!(matches!(result, Err(GeotagError::Encode(_))));
    }

    #[test]
    fn transparent_source_becomes_opaque_jpeg() {
        let output = process_image(&png_source(), 0.0, 0.0, "jpeg").unwrap();
        let decoded = ImageCodec.decode(&output.bytes).unwrap();
        assert!(!ColorMode::of(&decoded).has_alpha());
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    // ── collect_images ───────────────────────────────────────────────

    #[test]
    fn collect_images_single_file() {
        let dir = TempDir::new().unwrap();
        let jpg = dir.path().join("test.jpg");
        fs::write(&jpg, b"fake").unwrap();

        let images = collect_images(&[jpg.clone()]);
        assert_eq!(images, vec![jpg]);
    }

    #[test]
    fn collect_images_skips_unsupported() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("readme.txt");
        let heic = dir.path().join("photo.heic");
        fs::write(&txt, b"hello").unwrap();
        fs::write(&heic, b"fake").unwrap();

        assert!(collect_images(&[txt, heic]).is_empty());
    }

    #[test]
    fn collect_images_directory_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        fs::write(dir.path().join("a.jpg"), b"fake").unwrap();
        fs::write(sub.join("b.png"), b"fake").unwrap();
        fs::write(sub.join("c.WEBP"), b"fake").unwrap();
        fs::write(sub.join("d.txt"), b"fake").unwrap();

        let images = collect_images(&[dir.path().to_path_buf()]);
        assert_eq!(images.len(), 3);
    }

    #[test]
    fn collect_images_nonexistent_path() {
        let images = collect_images(&[PathBuf::from("/nonexistent/path")]);
        assert!(images.is_empty());
    }

    // ── output_file_name ─────────────────────────────────────────────

    #[test]
    fn output_name_appends_suffix_and_extension() {
        assert_eq!(
            output_file_name(Path::new("/tmp/photo.png"), OutputFormat::Jpeg, "_gps"),
            "photo_gps.jpeg"
        );
        assert_eq!(
            output_file_name(Path::new("archive.tar.png"), OutputFormat::WebP, ""),
            "archive.tar.webp"
        );
    }

    #[test]
    fn output_name_without_stem() {
        assert_eq!(output_file_name(Path::new("/"), OutputFormat::Png, "_gps"), "image_gps.png");
    }
}
