use super::tiff::{self, ByteOrder};
use crate::error::Result;
use crate::gps::{Coordinate, GpsDirectory, build_gps_directory, directory_to_coordinate};

/// The GPS section of a metadata container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpsSection {
    Present(GpsDirectory),
    Absent,
}

/// The EXIF block handed to the pixel codec. Only the GPS section is ever
/// populated; IFD0 carries nothing but the pointer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataContainer {
    gps: GpsSection,
}

impl Default for MetadataContainer {
    fn default() -> Self {
        Self::empty()
    }
}

impl MetadataContainer {
    /// A container without a GPS section.
    pub fn empty() -> Self {
        Self {
            gps: GpsSection::Absent,
        }
    }

    pub fn with_gps(directory: GpsDirectory) -> Self {
        Self {
            gps: GpsSection::Present(directory),
        }
    }

    /// Container holding the GPS directory for `coordinate`.
    pub fn for_coordinate(coordinate: &Coordinate) -> Self {
        Self::with_gps(build_gps_directory(coordinate))
    }

    pub fn gps(&self) -> &GpsSection {
        &self.gps
    }

    pub fn gps_directory(&self) -> Option<&GpsDirectory> {
        match &self.gps {
            GpsSection::Present(directory) => Some(directory),
            GpsSection::Absent => None,
        }
    }

    /// Serialize as a big-endian TIFF structure (no `Exif\0\0` prefix).
    pub fn to_tiff_bytes(&self) -> Result<Vec<u8>> {
        tiff::write_container(self, ByteOrder::BigEndian)
    }

    pub fn to_tiff_bytes_with(&self, order: ByteOrder) -> Result<Vec<u8>> {
        tiff::write_container(self, order)
    }

    /// Parse a TIFF structure, with or without a leading `Exif\0\0`.
    pub fn from_tiff_bytes(data: &[u8]) -> Result<Self> {
        tiff::read_container(data)
    }

    /// Coordinates stored in the GPS section, `None` when there are none.
    pub fn coordinate(&self) -> Result<Option<Coordinate>> {
        match &self.gps {
            GpsSection::Present(directory) => directory_to_coordinate(directory),
            GpsSection::Absent => Ok(None),
        }
    }
}
