//! TIFF structure of an EXIF block, limited to IFD0 and the GPS IFD.
//!
//! Serialization goes through `kamadak-exif`: the GPS directory becomes a
//! list of GPS-context fields, and the writer adds the IFD0 pointer
//! (tag 0x8825) to the GPS IFD.

use ::exif::experimental::Writer;
use ::exif::{Context, Field, In, Reader, Tag, Value};
use std::io::Cursor;

use super::container::MetadataContainer;
use crate::error::{GeotagError, Result};
use crate::gps::{GpsDirectory, Rational, TagValue};

/// JPEG APP1 payload prefix; some writers leave it in WebP EXIF chunks too.
const EXIF_PREFIX: &[u8] = b"Exif\0\0";

/// IFD0 tag pointing at the GPS IFD.
pub const TAG_GPS_IFD_POINTER: u16 = 0x8825;

/// Byte order of a TIFF structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// `MM` (Motorola). What we write unless told otherwise.
    #[default]
    BigEndian,
    /// `II` (Intel).
    LittleEndian,
}

impl ByteOrder {
    fn is_little_endian(self) -> bool {
        self == Self::LittleEndian
    }
}

fn to_field(tag: u16, value: &TagValue) -> Field {
    let value = match value {
        TagValue::Byte(bytes) => Value::Byte(bytes.clone()),
        TagValue::Ascii(text) => Value::Ascii(vec![text.clone()]),
        TagValue::Rational(values) => Value::Rational(
            values
                .iter()
                .map(|r| ::exif::Rational {
                    num: r.numerator,
                    denom: r.denominator,
                })
                .collect(),
        ),
        TagValue::Undefined(bytes) => Value::Undefined(bytes.clone(), 0),
    };
    Field {
        tag: Tag(Context::Gps, tag),
        ifd_num: In::PRIMARY,
        value,
    }
}

/// Directory value for a field, `None` for types the directory never holds.
fn from_value(value: &Value) -> Option<TagValue> {
    match value {
        Value::Byte(bytes) => Some(TagValue::Byte(bytes.clone())),
        Value::Ascii(parts) => Some(TagValue::Ascii(
            parts.first().cloned().unwrap_or_default(),
        )),
        Value::Rational(values) => Some(TagValue::Rational(
            values
                .iter()
                .map(|r| Rational::new(r.num, r.denom))
                .collect(),
        )),
        Value::Undefined(bytes, _) => Some(TagValue::Undefined(bytes.clone())),
        _ => None,
    }
}

/// Serialize the container. An absent or empty GPS section yields a TIFF
/// structure with an empty IFD0.
pub(crate) fn write_container(container: &MetadataContainer, order: ByteOrder) -> Result<Vec<u8>> {
    let fields: Vec<Field> = container
        .gps_directory()
        .map(|directory| {
            directory
                .iter()
                .map(|(tag, value)| to_field(tag, value))
                .collect()
        })
        .unwrap_or_default();

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }

    let mut out = Cursor::new(Vec::new());
    writer
        .write(&mut out, order.is_little_endian())
        .map_err(|e| GeotagError::Encode(format!("failed to serialize EXIF: {e}")))?;

    log::debug!("Serialized {} GPS tag(s) as TIFF", fields.len());
    Ok(out.into_inner())
}

/// Parse a TIFF structure, with or without the `Exif\0\0` prefix. Without a
/// GPS pointer the result has no GPS section.
pub(crate) fn read_container(data: &[u8]) -> Result<MetadataContainer> {
    let tiff = data.strip_prefix(EXIF_PREFIX).unwrap_or(data);
    let exif = Reader::new()
        .read_raw(tiff.to_vec())
        .map_err(|e| GeotagError::MalformedDirectory(e.to_string()))?;

    let mut has_pointer = false;
    let mut directory = GpsDirectory::new();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        if field.tag == Tag::GPSInfoIFDPointer {
            has_pointer = true;
            continue;
        }
        if field.tag.context() != Context::Gps {
            continue;
        }
        match from_value(&field.value) {
            Some(value) => directory.insert(field.tag.number(), value),
            None => log::debug!(
                "Skipping GPS tag 0x{:04X} of unsupported type",
                field.tag.number()
            ),
        }
    }

    if !has_pointer && directory.is_empty() {
        return Ok(MetadataContainer::empty());
    }
    Ok(MetadataContainer::with_gps(directory))
}
