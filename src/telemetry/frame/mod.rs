//! Fixed 24-byte telemetry frame exchanged over the radio link.
//!
//! Layout (multi-byte fields little-endian):
//!
//! | offset | len | field                                   |
//! |--------|-----|-----------------------------------------|
//! | 0      | 1   | frame length (24)                       |
//! | 1      | 1   | destination address (0, broadcast)      |
//! | 2      | 1   | source address (0)                      |
//! | 3      | 1   | control (0)                             |
//! | 4      | 6   | temperature i16, pressure u16, humidity u16 |
//! | 10     | 14  | date/time, latitude, longitude          |
use crate::error::{CodecError, FrameError};
use crate::infra::codec::cursor::{ByteReader, ByteWriter};
use crate::telemetry::types::{EnvironmentalSample, LocationTimeFix};

/// Total frame size, also carried in byte 0.
pub const FRAME_LEN: usize = 24;
/// Size of the addressing header preceding the payload.
pub const HEADER_LEN: usize = 4;

const BROADCAST_ADDRESS: u8 = 0;
const NODE_ADDRESS: u8 = 0;
const CONTROL: u8 = 0;

/// Encoded telemetry frame, ready to be pushed into the transceiver FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryFrame([u8; FRAME_LEN]);

impl TelemetryFrame {
    /// Lay out a sample and a fix into a new frame.
    pub fn encode(sample: &EnvironmentalSample, fix: &LocationTimeFix) -> Result<Self, CodecError> {
        let mut bytes = [0u8; FRAME_LEN];
        let mut writer = ByteWriter::new(&mut bytes);
        writer.write_slice(&[FRAME_LEN as u8, BROADCAST_ADDRESS, NODE_ADDRESS, CONTROL])?;
        sample.encode(&mut writer)?;
        fix.encode(&mut writer)?;
        Ok(Self(bytes))
    }

    /// Validate a received frame and recover its sample and fix.
    ///
    /// Addressing bytes are not interpreted. Trailing bytes beyond
    /// [`FRAME_LEN`] are ignored.
    pub fn decode(bytes: &[u8]) -> Result<(EnvironmentalSample, LocationTimeFix), FrameError> {
        let mut reader = ByteReader::new(bytes);
        let len = reader.read_u8()?;
        if usize::from(len) != FRAME_LEN {
            return Err(FrameError::BadLength(len));
        }
        reader.skip(HEADER_LEN - 1)?;
        let sample = EnvironmentalSample::decode(&mut reader)??;
        let fix = LocationTimeFix::decode(&mut reader)??;
        Ok((sample, fix))
    }

    /// Raw frame bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }
}
