use std::collections::BTreeMap;

use super::angle::{Axis, Hemisphere, Rational, SexagesimalAngle, ROUND_TRIP_TOLERANCE, decimal_to_angle};
use super::coordinate::Coordinate;
use crate::error::{GeotagError, Result};

// GPS IFD tag IDs
pub const TAG_GPS_VERSION_ID: u16 = 0x0000;
pub const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
pub const TAG_GPS_LATITUDE: u16 = 0x0002;
pub const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
pub const TAG_GPS_LONGITUDE: u16 = 0x0004;

/// GPSVersionID written into every directory we build (2.3.0.0).
pub const GPS_VERSION: [u8; 4] = [2, 3, 0, 0];

/// A typed tag value. Only the types the GPS coordinate tags use are modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// `BYTE`, e.g. GPSVersionID.
    Byte(Vec<u8>),
    /// `ASCII` without the trailing NUL, e.g. GPSLatitudeRef.
    Ascii(Vec<u8>),
    /// `RATIONAL`, e.g. GPSLatitude (degrees, minutes, seconds).
    Rational(Vec<Rational>),
    /// `UNDEFINED`: opaque bytes kept as read.
    Undefined(Vec<u8>),
}

impl TagValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Byte(_) => "BYTE",
            Self::Ascii(_) => "ASCII",
            Self::Rational(_) => "RATIONAL",
            Self::Undefined(_) => "UNDEFINED",
        }
    }
}

/// The GPS sub-directory of an EXIF block: tag id → value, ordered by tag id.
///
/// Directories built through [`GpsDirectory::set_angle`] always carry a
/// hemisphere reference and its magnitude together. Directories read from a
/// file may be partial; [`directory_to_coordinate`] sorts that out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpsDirectory {
    entries: BTreeMap<u16, TagValue>,
}

impl GpsDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_version(&mut self, version: [u8; 4]) {
        self.entries
            .insert(TAG_GPS_VERSION_ID, TagValue::Byte(version.to_vec()));
    }

    /// Set the reference byte and the rational triple of one axis at once.
    /// The axis comes from the angle's hemisphere.
    pub fn set_angle(&mut self, angle: &SexagesimalAngle) {
        let (ref_tag, value_tag) = axis_tags(angle.hemisphere.axis());
        self.entries.insert(
            ref_tag,
            TagValue::Ascii(vec![angle.hemisphere.as_ascii()]),
        );
        self.entries
            .insert(value_tag, TagValue::Rational(angle.to_rationals().to_vec()));
    }

    pub fn get(&self, tag: u16) -> Option<&TagValue> {
        self.entries.get(&tag)
    }

    /// Entries in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &TagValue)> {
        self.entries.iter().map(|(tag, value)| (*tag, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw insert for values read back from a file.
    pub(crate) fn insert(&mut self, tag: u16, value: TagValue) {
        self.entries.insert(tag, value);
    }
}

fn axis_tags(axis: Axis) -> (u16, u16) {
    match axis {
        Axis::Latitude => (TAG_GPS_LATITUDE_REF, TAG_GPS_LATITUDE),
        Axis::Longitude => (TAG_GPS_LONGITUDE_REF, TAG_GPS_LONGITUDE),
    }
}

/// Build the five-entry GPS directory for a coordinate: version marker plus
/// reference and rational triple for each axis.
pub fn build_gps_directory(coordinate: &Coordinate) -> GpsDirectory {
    let latitude = decimal_to_angle(coordinate.latitude(), Axis::Latitude);
    let longitude = decimal_to_angle(coordinate.longitude(), Axis::Longitude);

    let mut directory = GpsDirectory::new();
    directory.set_version(GPS_VERSION);
    directory.set_angle(&latitude);
    directory.set_angle(&longitude);

    log::debug!(
        "GPS directory: {}°{}'{}\" {} / {}°{}'{}\" {}",
        latitude.degrees,
        latitude.minutes,
        latitude.seconds.to_f64().unwrap_or_default(),
        latitude.hemisphere.as_ascii() as char,
        longitude.degrees,
        longitude.minutes,
        longitude.seconds.to_f64().unwrap_or_default(),
        longitude.hemisphere.as_ascii() as char,
    );
    directory
}

/// Reconstruct decimal coordinates from a GPS directory.
///
/// * `Ok(None)` — latitude or longitude triple is missing; not an error.
/// * `Err(MalformedDirectory)` — the tags are there but cannot be read
///   (wrong shape, zero denominator, bad or missing hemisphere byte).
pub fn directory_to_coordinate(directory: &GpsDirectory) -> Result<Option<Coordinate>> {
    let (Some(lat_value), Some(lon_value)) = (
        directory.get(TAG_GPS_LATITUDE),
        directory.get(TAG_GPS_LONGITUDE),
    ) else {
        return Ok(None);
    };

    let latitude = decode_axis(directory, lat_value, Axis::Latitude)?;
    let longitude = decode_axis(directory, lon_value, Axis::Longitude)?;

    Coordinate::new(latitude, longitude)
        .map(Some)
        .map_err(|e| GeotagError::MalformedDirectory(e.to_string()))
}

fn decode_axis(directory: &GpsDirectory, value: &TagValue, axis: Axis) -> Result<f64> {
    let (ref_tag, _) = axis_tags(axis);

    let rationals = match value {
        TagValue::Rational(rationals) if rationals.len() == 3 => rationals,
        TagValue::Rational(rationals) => {
            return Err(GeotagError::MalformedDirectory(format!(
                "{} holds {} rationals, expected 3",
                axis.name(),
                rationals.len()
            )));
        }
        other => {
            return Err(GeotagError::MalformedDirectory(format!(
                "{} stored as {}, expected RATIONAL",
                axis.name(),
                other.type_name()
            )));
        }
    };

    let hemisphere = match directory.get(ref_tag) {
        Some(TagValue::Ascii(code)) => code
            .first()
            .and_then(|&c| Hemisphere::from_ascii(c, axis)),
        _ => None,
    }
    .ok_or_else(|| {
        GeotagError::MalformedDirectory(format!("unreadable {} reference", axis.name()))
    })?;

    let mut magnitude = 0.0;
    for (rational, scale) in rationals.iter().zip([1.0, 60.0, 3600.0]) {
        let part = rational.to_f64().ok_or_else(|| {
            GeotagError::MalformedDirectory(format!("zero denominator in {}", axis.name()))
        })?;
        magnitude += part / scale;
    }

    // Seconds rounding may push a value at the limit a hair past it.
    let limit = axis.limit();
    if magnitude > limit + ROUND_TRIP_TOLERANCE {
        return Err(GeotagError::MalformedDirectory(format!(
            "{} magnitude {magnitude} exceeds {limit}",
            axis.name()
        )));
    }

    Ok(magnitude.min(limit) * hemisphere.sign())
}
