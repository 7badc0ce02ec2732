/// Denominator used for the seconds component of an encoded angle.
///
/// Four decimal digits of an arc-second, about 3.1 mm at the equator.
pub const SECONDS_DENOMINATOR: u32 = 10_000;

/// Largest error a decimal → rational → decimal round trip may introduce,
/// in degrees: half of one seconds quantum.
pub const ROUND_TRIP_TOLERANCE: f64 = 0.5 / (3600.0 * SECONDS_DENOMINATOR as f64);

/// Which coordinate axis a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Largest valid magnitude in decimal degrees.
    pub fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }
}

/// Hemisphere flag carrying the sign of a sexagesimal magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Hemisphere for a signed decimal value.
    ///
    /// Zero (including `-0.0`) maps to North / East. This is a convention
    /// kept for compatibility with existing files, not a physical fact.
    pub fn for_value(value: f64, axis: Axis) -> Self {
        let non_negative = value >= 0.0;
        match (axis, non_negative) {
            (Axis::Latitude, true) => Self::North,
            (Axis::Latitude, false) => Self::South,
            (Axis::Longitude, true) => Self::East,
            (Axis::Longitude, false) => Self::West,
        }
    }

    /// Parse the ASCII reference byte stored in the tag directory.
    /// Returns `None` when the byte is not a valid hemisphere for `axis`.
    pub fn from_ascii(code: u8, axis: Axis) -> Option<Self> {
        match (axis, code) {
            (Axis::Latitude, b'N') => Some(Self::North),
            (Axis::Latitude, b'S') => Some(Self::South),
            (Axis::Longitude, b'E') => Some(Self::East),
            (Axis::Longitude, b'W') => Some(Self::West),
            _ => None,
        }
    }

    pub fn as_ascii(self) -> u8 {
        match self {
            Self::North => b'N',
            Self::South => b'S',
            Self::East => b'E',
            Self::West => b'W',
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Latitude,
            Self::East | Self::West => Axis::Longitude,
        }
    }

    /// `-1.0` for South and West, `1.0` otherwise.
    pub fn sign(self) -> f64 {
        match self {
            Self::South | Self::West => -1.0,
            Self::North | Self::East => 1.0,
        }
    }
}

/// An unsigned rational as stored by the EXIF `RATIONAL` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// An exact integer over denominator 1.
    pub fn integer(value: u32) -> Self {
        Self::new(value, 1)
    }

    /// The rational as a float, or `None` for a zero denominator.
    pub fn to_f64(self) -> Option<f64> {
        if self.denominator == 0 {
            None
        } else {
            Some(f64::from(self.numerator) / f64::from(self.denominator))
        }
    }
}

/// Degrees / minutes / seconds with the sign folded into the hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SexagesimalAngle {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: Rational,
    pub hemisphere: Hemisphere,
}

impl SexagesimalAngle {
    /// The three rationals written to the directory: degrees, minutes, seconds.
    pub fn to_rationals(&self) -> [Rational; 3] {
        [
            Rational::integer(self.degrees),
            Rational::integer(self.minutes),
            self.seconds,
        ]
    }

    /// Signed decimal degrees, `None` when the seconds have a zero
    /// denominator.
    pub fn to_decimal(&self) -> Option<f64> {
        let seconds = self.seconds.to_f64()?;
        let magnitude =
            f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + seconds / 3600.0;
        Some(magnitude * self.hemisphere.sign())
    }
}

/// Split a decimal-degree value into a sexagesimal angle.
///
/// Degrees and minutes are floored; seconds are rounded to
/// [`SECONDS_DENOMINATOR`] and kept as a rational.
pub fn decimal_to_angle(value: f64, axis: Axis) -> SexagesimalAngle {
    let hemisphere = Hemisphere::for_value(value, axis);

    let magnitude = value.abs();
    let degrees = magnitude.floor();
    let minutes_decimal = (magnitude - degrees) * 60.0;
    let minutes = minutes_decimal.floor();
    let seconds = (minutes_decimal - minutes) * 60.0;
    let seconds_scaled = (seconds * f64::from(SECONDS_DENOMINATOR)).round();

    SexagesimalAngle {
        degrees: degrees as u32,
        minutes: minutes as u32,
        seconds: Rational::new(seconds_scaled as u32, SECONDS_DENOMINATOR),
        hemisphere,
    }
}
