//! EXIF metadata container: serialization of the GPS tag directory into the
//! TIFF structure embedded in JPEG (APP1) and WebP (`EXIF` chunk) files, and
//! reading it back.
//!
//! - [`MetadataContainer`] — the block handed to the pixel codec
//! - [`read_coordinates`] — read GPS coordinates from image bytes

mod container;
mod reader;
mod tiff;

pub use container::{GpsSection, MetadataContainer};
pub use reader::{extract_exif, read_coordinates};
pub use tiff::{ByteOrder, TAG_GPS_IFD_POINTER};
