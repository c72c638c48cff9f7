//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (radio bus traffic, producer
//! validation, frame decoding, etc.). None of them is fatal: callers log and
//! retry on their next cadence.
use crate::radio::RadioMode;
use thiserror_no_std::Error;

//==================================================================================RADIO_ERROR
#[derive(Error, Debug)]
/// Failures raised by the radio link driver.
pub enum RadioError<E: core::fmt::Debug> {
    /// A register or FIFO transaction failed on the bus.
    #[error("Radio bus error: {0:?}")]
    Bus(E),

    /// The version register did not return the expected transceiver ID.
    #[error("Radio not found: version register reads {version:#04X}")]
    DeviceNotFound { version: u8 },

    /// The transceiver never raised its mode-ready flag.
    #[error("Timed out entering {target:?} mode")]
    ModeTimeout { target: RadioMode },

    /// The carrier frequency does not fit the 24-bit frequency register.
    #[error("Carrier frequency {frequency_khz} kHz out of register range")]
    FrequencyOutOfRange { frequency_khz: u32 },

    /// A received packet announced a length the receive buffer cannot hold.
    #[error("Received payload length {len} is out of range")]
    PayloadTooLong { len: u8 },
}

//==================================================================================SPI_BUS_ERROR
#[derive(Error, Debug)]
/// Errors surfaced by the SPI implementation of the radio bus.
pub enum SpiBusError<S: core::fmt::Debug> {
    /// The SPI peripheral rejected the transfer.
    #[error("SPI transfer failed: {0:?}")]
    Spi(S),
    /// Chip-select or reset line could not be driven.
    #[error("Control pin could not be driven")]
    Pin,
}

//==================================================================================PRODUCER_ERRORS
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Location/time fields rejected while building a fix.
pub enum FixError {
    /// A calendar or clock field is outside its range.
    #[error("Invalid {field}: {value}")]
    InvalidDateTime { field: &'static str, value: u8 },
    /// Degrees exceed the axis limit (90 for latitude, 180 for longitude).
    #[error("Degrees out of range: {degrees}")]
    DegreesOutOfRange { degrees: u8 },
    /// Minutes or seconds of arc are not in 0..=59.
    #[error("Minutes/seconds out of range: {value}")]
    ArcOutOfRange { value: u8 },
    /// Hemisphere does not belong to the axis (N/S for latitude, E/W for longitude).
    #[error("Hemisphere {hemisphere} does not match the axis")]
    WrongHemisphere { hemisphere: char },
    /// Hemisphere byte is not one of `N`, `S`, `E`, `W`.
    #[error("Unknown hemisphere byte {byte:#04X}")]
    UnknownHemisphere { byte: u8 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Environmental readings outside the transmitted domain.
pub enum SampleError {
    /// Temperature (0.1 °C) outside -900..=1400.
    #[error("Temperature out of range: {0}")]
    Temperature(i32),
    /// Pressure (0.1 mbar) outside 8700..=11000.
    #[error("Pressure out of range: {0}")]
    Pressure(u32),
    /// Humidity (0.1 %) outside 0..=1000.
    #[error("Humidity out of range: {0}")]
    Humidity(u32),
}

#[derive(Error, Debug)]
/// Failures of one environmental measurement cycle.
pub enum SensorError<E: core::fmt::Debug> {
    /// The sensor driver failed to produce a reading.
    #[error("Sensor error: {0:?}")]
    Sensor(E),
    /// The reading converted to values outside the transmitted domain.
    #[error(transparent)]
    Sample(#[from] SampleError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons a navigation sentence is discarded.
pub enum SentenceError {
    /// Sentence shorter or longer than the accepted window.
    #[error("Sentence length {len} out of range")]
    InvalidLength { len: usize },
    /// Not a recommended-minimum (RMC) sentence.
    #[error("Unsupported sentence type")]
    UnsupportedSentence,
    /// Wrong number of comma-separated fields.
    #[error("Expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    /// Checksum delimiter missing or checksum digits unreadable.
    #[error("Malformed checksum")]
    MalformedChecksum,
    /// Computed XOR checksum differs from the transmitted one.
    #[error("Checksum mismatch: computed {computed:#04X}, received {received:#04X}")]
    ChecksumMismatch { computed: u8, received: u8 },
    /// Receiver reports the fix as void.
    #[error("Receiver reports no valid fix")]
    NoFix,
    /// A field has an unexpected shape (length, separator, digits).
    #[error("Malformed field #{index}")]
    MalformedField { index: usize },
    /// Field values parsed but violate fix constraints.
    #[error(transparent)]
    Fix(#[from] FixError),
}

//==================================================================================FRAME_ERRORS
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Byte-cursor failures while reading or writing a frame buffer.
pub enum CodecError {
    /// Attempted to access bytes past the end of the buffer.
    #[error("Out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures while decoding a received telemetry frame.
pub enum FrameError {
    /// Leading length byte differs from the fixed frame size.
    #[error("Unexpected frame length byte {0}")]
    BadLength(u8),
    /// Buffer ended before the frame was complete.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Embedded sample violates its value domain.
    #[error(transparent)]
    Sample(#[from] SampleError),
    /// Embedded fix violates its value domain.
    #[error(transparent)]
    Fix(#[from] FixError),
}
