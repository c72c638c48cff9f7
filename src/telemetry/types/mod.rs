//! Validated value types exchanged between producers, the orchestrator and
//! the wire frame.
//!
//! Every type here is only constructible through a checking constructor, so a
//! value that exists is a value that may be transmitted as-is.
use crate::error::{CodecError, FixError, SampleError};
use crate::infra::codec::cursor::{ByteReader, ByteWriter};

//==================================================================================DATE_TIME
/// Calendar date and UTC time of day, years counted from 2000.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    year: u8,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DateTime {
    /// Packed size: one byte per field.
    pub const PACKED_LEN: usize = 6;

    /// Validate and build a date/time. The day is checked against the month
    /// length, leap years included.
    pub fn new(
        year: u8,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, FixError> {
        check_field("year", year, 0, 99)?;
        check_field("month", month, 1, 12)?;
        check_field("day", day, 1, days_in_month(year, month))?;
        check_field("hour", hour, 0, 23)?;
        check_field("minute", minute, 0, 59)?;
        check_field("second", second, 0, 59)?;
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Years since 2000 (0-99).
    pub fn year(&self) -> u8 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter<'_>) -> Result<(), CodecError> {
        writer.write_slice(&[
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ])
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Result<Self, FixError>, CodecError> {
        let raw = reader.read_slice(Self::PACKED_LEN)?;
        Ok(Self::new(raw[0], raw[1], raw[2], raw[3], raw[4], raw[5]))
    }
}

fn check_field(field: &'static str, value: u8, min: u8, max: u8) -> Result<(), FixError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FixError::InvalidDateTime { field, value })
    }
}

fn days_in_month(year: u8, month: u8) -> u8 {
    match month {
        2 if year % 4 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

//==================================================================================ANGLE
/// Cardinal direction qualifying an [`Angle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parse the ASCII letter used on the wire and in navigation sentences.
    pub fn from_ascii(byte: u8) -> Result<Self, FixError> {
        match byte {
            b'N' => Ok(Self::North),
            b'S' => Ok(Self::South),
            b'E' => Ok(Self::East),
            b'W' => Ok(Self::West),
            byte => Err(FixError::UnknownHemisphere { byte }),
        }
    }

    /// ASCII letter of the hemisphere.
    pub fn as_ascii(self) -> u8 {
        match self {
            Self::North => b'N',
            Self::South => b'S',
            Self::East => b'E',
            Self::West => b'W',
        }
    }

    fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Latitude,
            Self::East | Self::West => Axis::Longitude,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn max_degrees(self) -> u8 {
        match self {
            Self::Latitude => 90,
            Self::Longitude => 180,
        }
    }
}

/// Geographic coordinate in degrees, minutes and seconds of arc.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angle {
    degrees: u8,
    minutes: u8,
    seconds: u8,
    hemisphere: Hemisphere,
}

impl Angle {
    /// Packed size: degrees, minutes, seconds, hemisphere letter.
    pub const PACKED_LEN: usize = 4;

    /// Build a latitude (0-90 degrees, North or South).
    pub fn latitude(
        degrees: u8,
        minutes: u8,
        seconds: u8,
        hemisphere: Hemisphere,
    ) -> Result<Self, FixError> {
        Self::checked(Axis::Latitude, degrees, minutes, seconds, hemisphere)
    }

    /// Build a longitude (0-180 degrees, East or West).
    pub fn longitude(
        degrees: u8,
        minutes: u8,
        seconds: u8,
        hemisphere: Hemisphere,
    ) -> Result<Self, FixError> {
        Self::checked(Axis::Longitude, degrees, minutes, seconds, hemisphere)
    }

    /// Build an angle from whole minutes plus a decimal minute fraction
    /// `fraction / scale` (e.g. `4723.5075` gives minutes 23, fraction 5075,
    /// scale 10000). The axis follows the hemisphere.
    ///
    /// Seconds are `round(fraction * 60 / scale)`, half rounding up. A result
    /// of 60 carries into the minutes, and 60 minutes carry into the degrees;
    /// the carried value must still be on the axis.
    pub fn from_fractional_minutes(
        degrees: u8,
        minutes: u8,
        fraction: u32,
        scale: u32,
        hemisphere: Hemisphere,
    ) -> Result<Self, FixError> {
        if minutes > 59 {
            return Err(FixError::ArcOutOfRange { value: minutes });
        }
        if scale == 0 || fraction >= scale {
            return Err(FixError::ArcOutOfRange { value: minutes });
        }

        let scale = u64::from(scale);
        let rounded = (u64::from(fraction) * 60 + scale / 2) / scale;
        // `fraction < scale` bounds the result to 0..=60.
        let mut seconds = rounded as u8;
        let mut minutes = minutes;
        let mut degrees = degrees;

        if seconds == 60 {
            seconds = 0;
            minutes += 1;
        }
        if minutes == 60 {
            minutes = 0;
            degrees = degrees
                .checked_add(1)
                .ok_or(FixError::DegreesOutOfRange { degrees })?;
        }

        Self::checked(hemisphere.axis(), degrees, minutes, seconds, hemisphere)
    }

    fn checked(
        axis: Axis,
        degrees: u8,
        minutes: u8,
        seconds: u8,
        hemisphere: Hemisphere,
    ) -> Result<Self, FixError> {
        if hemisphere.axis() != axis {
            return Err(FixError::WrongHemisphere {
                hemisphere: hemisphere.as_ascii() as char,
            });
        }
        if minutes > 59 {
            return Err(FixError::ArcOutOfRange { value: minutes });
        }
        if seconds > 59 {
            return Err(FixError::ArcOutOfRange { value: seconds });
        }
        let max = axis.max_degrees();
        if degrees > max || (degrees == max && (minutes != 0 || seconds != 0)) {
            return Err(FixError::DegreesOutOfRange { degrees });
        }
        Ok(Self {
            degrees,
            minutes,
            seconds,
            hemisphere,
        })
    }

    pub fn degrees(&self) -> u8 {
        self.degrees
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    fn encode(&self, writer: &mut ByteWriter<'_>) -> Result<(), CodecError> {
        writer.write_slice(&[
            self.degrees,
            self.minutes,
            self.seconds,
            self.hemisphere.as_ascii(),
        ])
    }

    fn decode(reader: &mut ByteReader<'_>, axis: Axis) -> Result<Result<Self, FixError>, CodecError> {
        let raw = reader.read_slice(Self::PACKED_LEN)?;
        Ok(Hemisphere::from_ascii(raw[3])
            .and_then(|hemisphere| Self::checked(axis, raw[0], raw[1], raw[2], hemisphere)))
    }
}

//==================================================================================LOCATION_TIME_FIX
/// Validated date, time and position reported by the navigation receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocationTimeFix {
    datetime: DateTime,
    latitude: Angle,
    longitude: Angle,
}

impl LocationTimeFix {
    /// Packed size on the wire.
    pub const PACKED_LEN: usize = DateTime::PACKED_LEN + 2 * Angle::PACKED_LEN;

    /// Combine a date/time with a latitude and a longitude. Rejects angles
    /// given on the wrong axis.
    pub fn new(datetime: DateTime, latitude: Angle, longitude: Angle) -> Result<Self, FixError> {
        for (angle, axis) in [(latitude, Axis::Latitude), (longitude, Axis::Longitude)] {
            if angle.hemisphere.axis() != axis {
                return Err(FixError::WrongHemisphere {
                    hemisphere: angle.hemisphere.as_ascii() as char,
                });
            }
        }
        Ok(Self {
            datetime,
            latitude,
            longitude,
        })
    }

    pub fn datetime(&self) -> DateTime {
        self.datetime
    }

    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    pub fn longitude(&self) -> Angle {
        self.longitude
    }

    /// Replace the date/time, keeping the position.
    pub fn with_datetime(self, datetime: DateTime) -> Self {
        Self { datetime, ..self }
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter<'_>) -> Result<(), CodecError> {
        self.datetime.encode(writer)?;
        self.latitude.encode(writer)?;
        self.longitude.encode(writer)
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Result<Self, FixError>, CodecError> {
        let datetime = DateTime::decode(reader)?;
        let latitude = Angle::decode(reader, Axis::Latitude)?;
        let longitude = Angle::decode(reader, Axis::Longitude)?;
        Ok(datetime.and_then(|datetime| {
            Ok(Self {
                datetime,
                latitude: latitude?,
                longitude: longitude?,
            })
        }))
    }
}

//==================================================================================ENVIRONMENTAL_SAMPLE
/// Validated temperature, pressure and humidity reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvironmentalSample {
    temperature: i16,
    pressure: u16,
    humidity: u16,
}

impl EnvironmentalSample {
    /// Packed size on the wire.
    pub const PACKED_LEN: usize = 6;
    /// Accepted temperature range (0.1 °C).
    pub const TEMPERATURE_RANGE: core::ops::RangeInclusive<i16> = -900..=1400;
    /// Accepted pressure range (0.1 mbar).
    pub const PRESSURE_RANGE: core::ops::RangeInclusive<u16> = 8700..=11000;
    /// Accepted humidity range (0.1 %).
    pub const HUMIDITY_RANGE: core::ops::RangeInclusive<u16> = 0..=1000;

    /// Validate and build a sample from tenths of °C, mbar and percent.
    pub fn new(temperature: i16, pressure: u16, humidity: u16) -> Result<Self, SampleError> {
        if !Self::TEMPERATURE_RANGE.contains(&temperature) {
            return Err(SampleError::Temperature(i32::from(temperature)));
        }
        if !Self::PRESSURE_RANGE.contains(&pressure) {
            return Err(SampleError::Pressure(u32::from(pressure)));
        }
        if !Self::HUMIDITY_RANGE.contains(&humidity) {
            return Err(SampleError::Humidity(u32::from(humidity)));
        }
        Ok(Self {
            temperature,
            pressure,
            humidity,
        })
    }

    /// Temperature in 0.1 °C.
    pub fn temperature(&self) -> i16 {
        self.temperature
    }

    /// Pressure in 0.1 mbar.
    pub fn pressure(&self) -> u16 {
        self.pressure
    }

    /// Relative humidity in 0.1 %.
    pub fn humidity(&self) -> u16 {
        self.humidity
    }

    pub(crate) fn encode(&self, writer: &mut ByteWriter<'_>) -> Result<(), CodecError> {
        writer.write_i16(self.temperature)?;
        writer.write_u16(self.pressure)?;
        writer.write_u16(self.humidity)
    }

    pub(crate) fn decode(
        reader: &mut ByteReader<'_>,
    ) -> Result<Result<Self, SampleError>, CodecError> {
        let temperature = reader.read_i16()?;
        let pressure = reader.read_u16()?;
        let humidity = reader.read_u16()?;
        Ok(Self::new(temperature, pressure, humidity))
    }
}
