use image::ImageFormat;
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::webp::WebP;
use img_parts::{Bytes, ImageEXIF};

use super::container::MetadataContainer;
use crate::error::{GeotagError, Result};
use crate::gps::Coordinate;

fn parse_error(container: &str, e: img_parts::Error) -> GeotagError {
    GeotagError::ImageDecode(format!("failed to parse {container}: {e}"))
}

/// Pull the raw EXIF block (TIFF data) out of a JPEG, WebP or PNG file.
///
/// Returns `Ok(None)` when the file has no EXIF block or is a format we do
/// not read metadata from. Bytes that are not a recognizable image are an
/// [`GeotagError::ImageDecode`].
pub fn extract_exif(image_bytes: &[u8]) -> Result<Option<Bytes>> {
    let format =
        image::guess_format(image_bytes).map_err(|e| GeotagError::ImageDecode(e.to_string()))?;
    let data = Bytes::copy_from_slice(image_bytes);

    let exif = match format {
        ImageFormat::Jpeg => Jpeg::from_bytes(data)
            .map_err(|e| parse_error("JPEG", e))?
            .exif(),
        ImageFormat::WebP => WebP::from_bytes(data)
            .map_err(|e| parse_error("WebP", e))?
            .exif(),
        ImageFormat::Png => Png::from_bytes(data)
            .map_err(|e| parse_error("PNG", e))?
            .exif(),
        other => {
            log::debug!("Not reading EXIF from {other:?}");
            None
        }
    };

    Ok(exif)
}

/// Read GPS coordinates embedded in an image.
///
/// * `Ok(Some(_))` — coordinates found.
/// * `Ok(None)` — no EXIF, no GPS section, or no latitude/longitude.
/// * `Err(MalformedDirectory)` — GPS data present but unreadable.
pub fn read_coordinates(image_bytes: &[u8]) -> Result<Option<Coordinate>> {
    let Some(exif) = extract_exif(image_bytes)? else {
        log::debug!("No EXIF data found");
        return Ok(None);
    };

    MetadataContainer::from_tiff_bytes(&exif)?.coordinate()
}
