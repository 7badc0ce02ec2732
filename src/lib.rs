//! # geotag
//!
//! Geotag images: re-encode a source image as JPEG, PNG or WebP and embed
//! GPS coordinates (given directly or resolved from an address) in its EXIF
//! block.
//!
//! ## Quick Start
//!
//! The pipeline module handles the full validate → normalize → encode →
//! embed flow:
//!
//! ```rust,no_run
//! use geotag::pipeline::{Embedding, process_image};
//!
//! fn main() -> anyhow::Result<()> {
//!     let source = std::fs::read("photo.png")?;
//!
//!     // Eiffel Tower
//!     let output = process_image(&source, 48.8584, 2.2945, "jpeg")?;
//!     std::fs::write("photo_gps.jpeg", &output.bytes)?;
//!
//!     match output.embedding {
//!         Embedding::Embedded => println!("GPS embedded"),
//!         Embedding::Skipped => println!("format does not carry GPS"),
//!         Embedding::FellBack(reason) => println!("saved without GPS: {reason}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Geocoding and Reading Back
//!
//! ```rust,no_run
//! use geotag::config::Config;
//! use geotag::exif::read_coordinates;
//! use geotag::geocode::{NominatimGeocoder, resolve_address};
//! use geotag::pipeline::ImageProcessor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     // 1. Resolve an address
//!     let geocoder = NominatimGeocoder::new(&config.geocoder)?;
//!     let Some(location) = resolve_address(&geocoder, "Champ de Mars, Paris").await? else {
//!         anyhow::bail!("address not found");
//!     };
//!
//!     // 2. Re-encode with the coordinates attached
//!     let processor = ImageProcessor::new(config.encoding.clone());
//!     let source = std::fs::read("photo.png")?;
//!     let output = processor.process(&source, location.latitude(), location.longitude(), "webp")?;
//!
//!     // 3. Read them back
//!     println!("{:?}", read_coordinates(&output.bytes)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Formats
//!
//! | Format | GPS Embedding |
//! |--------|---------------|
//! | JPEG (`jpeg`, `jpg`) | EXIF in APP1 segment |
//! | WebP (`webp`) | EXIF chunk (lossy encode at the configured quality) |
//! | PNG (`png`) | Not embedded |
//!
//! ## Modules
//!
//! - [`gps`] — decimal ↔ sexagesimal ↔ rational conversion and the GPS tag directory
//! - [`exif`] — TIFF serialization of the metadata container, reading GPS back
//! - [`codec`] — pixel codec trait and the `image`-backed implementation
//! - [`pipeline`] — re-encoding pipeline, image collection, output naming
//! - [`geocode`] — address lookup trait, retry policy, Nominatim client
//! - [`config`] — configuration types and loading/saving

pub mod codec;
pub mod config;
pub mod error;
pub mod exif;
pub mod geocode;
pub mod gps;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{GeotagError, Result};
