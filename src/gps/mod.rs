//! Coordinate codec: decimal degrees ↔ degrees/minutes/seconds ↔ EXIF GPS
//! tag directory.
//!
//! Everything here is pure and deterministic. The byte layout of the
//! directory lives in [`crate::exif`].
//!
//! ```rust
//! use geotag::gps::{Coordinate, build_gps_directory, directory_to_coordinate};
//!
//! let eiffel = Coordinate::new(48.8584, 2.2945)?;
//! let directory = build_gps_directory(&eiffel);
//! let back = directory_to_coordinate(&directory)?.expect("coordinates present");
//! assert!((back.latitude() - 48.8584).abs() < 1e-7);
//! # Ok::<(), geotag::GeotagError>(())
//! ```

mod angle;
mod coordinate;
mod directory;

pub use angle::{
    Axis, Hemisphere, Rational, SexagesimalAngle, ROUND_TRIP_TOLERANCE, SECONDS_DENOMINATOR,
    decimal_to_angle,
};
pub use coordinate::Coordinate;
pub use directory::{
    GPS_VERSION, GpsDirectory, TAG_GPS_LATITUDE, TAG_GPS_LATITUDE_REF, TAG_GPS_LONGITUDE,
    TAG_GPS_LONGITUDE_REF, TAG_GPS_VERSION_ID, TagValue, build_gps_directory,
    directory_to_coordinate,
};
