//! Recommended-minimum (RMC) navigation sentence assembly and parsing.
//!
//! Bytes from the receiver UART are pushed one at a time into a
//! [`SentenceAssembler`]. A `$` always restarts a sentence, a CR or LF ends
//! it, and complete sentences are checked (length window, sentence type,
//! field count, XOR checksum, fix validity) before being turned into a
//! [`LocationTimeFix`].
//!
//! Coordinates arrive as `ddmm.ffff` / `dddmm.ffff`; the minute fraction is
//! rounded to whole seconds of arc (see [`Angle::from_fractional_minutes`]).
use heapless::Vec;

use crate::error::SentenceError;
use crate::infra::mailbox::{Delivery, Mailbox};
use crate::telemetry::types::{Angle, DateTime, Hemisphere, LocationTimeFix};

/// Assembly buffer size; longer input is truncated and later rejected.
pub const SENTENCE_CAPACITY: usize = 96;
/// Shortest sentence worth parsing.
pub const MIN_SENTENCE_LEN: usize = 16;
/// Longest sentence accepted: the NMEA 0183 limit of 82 characters minus
/// the line terminator.
pub const MAX_SENTENCE_LEN: usize = 80;
/// Comma-separated fields of an RMC sentence, mode indicator included.
pub const RMC_FIELDS: usize = 13;
/// Longest minute fraction accepted (digits).
const MAX_FRACTION_DIGITS: usize = 6;

const SENTENCE_START: u8 = b'$';
const CHECKSUM_DELIMITER: u8 = b'*';
const FIX_VALID: &[u8] = b"A";

// Field positions.
const FIELD_TIME: usize = 1;
const FIELD_STATUS: usize = 2;
const FIELD_LATITUDE: usize = 3;
const FIELD_LATITUDE_HEMISPHERE: usize = 4;
const FIELD_LONGITUDE: usize = 5;
const FIELD_LONGITUDE_HEMISPHERE: usize = 6;
const FIELD_DATE: usize = 9;

//==================================================================================ASSEMBLER
/// Byte-wise sentence assembler.
#[derive(Default)]
pub struct SentenceAssembler {
    buffer: Vec<u8, SENTENCE_CAPACITY>,
}

impl SentenceAssembler {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Push one received byte. Returns the parse result when the byte
    /// completed a sentence.
    pub fn push(&mut self, byte: u8) -> Option<Result<LocationTimeFix, SentenceError>> {
        match byte {
            b'\r' | b'\n' if !self.buffer.is_empty() => {
                let result = parse_rmc(&self.buffer);
                self.buffer.clear();
                Some(result)
            }
            SENTENCE_START => {
                self.buffer.clear();
                // Capacity is never zero.
                let _ = self.buffer.push(byte);
                None
            }
            _ => {
                if self.buffer.first() == Some(&SENTENCE_START) {
                    // Overlong sentences are cut here and fail the length check.
                    let _ = self.buffer.push(byte);
                }
                None
            }
        }
    }

    /// Push a chunk of bytes and post every valid fix into `fixes`, newest
    /// replacing any unread one. Returns the delivery of the last fix posted.
    pub fn feed(&mut self, bytes: &[u8], fixes: &Mailbox<LocationTimeFix>) -> Option<Delivery> {
        let mut last = None;
        for &byte in bytes {
            match self.push(byte) {
                Some(Ok(fix)) => last = Some(fixes.post_latest(fix)),
                Some(Err(_err)) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("Sentence discarded: {}", _err);
                }
                None => {}
            }
        }
        last
    }
}

//==================================================================================PARSER
/// Validate and decode one complete RMC sentence (without line terminator).
pub fn parse_rmc(sentence: &[u8]) -> Result<LocationTimeFix, SentenceError> {
    let len = sentence.len();
    if !(MIN_SENTENCE_LEN..=MAX_SENTENCE_LEN).contains(&len) {
        return Err(SentenceError::InvalidLength { len });
    }
    if !(sentence.starts_with(b"$GPRMC,") || sentence.starts_with(b"$GNRMC,")) {
        return Err(SentenceError::UnsupportedSentence);
    }

    let commas = sentence.iter().filter(|&&b| b == b',').count();
    if commas + 1 != RMC_FIELDS {
        return Err(SentenceError::FieldCount {
            expected: RMC_FIELDS,
            found: commas + 1,
        });
    }

    if sentence[len - 3] != CHECKSUM_DELIMITER {
        return Err(SentenceError::MalformedChecksum);
    }
    let body = &sentence[1..len - 3];
    let computed = body.iter().fold(0u8, |acc, &b| acc ^ b);
    let received = parse_hex_byte(&sentence[len - 2..]).ok_or(SentenceError::MalformedChecksum)?;
    if computed != received {
        return Err(SentenceError::ChecksumMismatch { computed, received });
    }

    let mut fields: [&[u8]; RMC_FIELDS] = [b"".as_slice(); RMC_FIELDS];
    for (slot, field) in fields.iter_mut().zip(body.split(|&b| b == b',')) {
        *slot = field;
    }

    if fields[FIELD_STATUS] != FIX_VALID {
        return Err(SentenceError::NoFix);
    }

    // hhmmss[.ss]
    let time = fields[FIELD_TIME];
    if time.len() < 6 {
        return Err(SentenceError::MalformedField { index: FIELD_TIME });
    }
    let hour = parse_two_digits(&time[0..2], FIELD_TIME)?;
    let minute = parse_two_digits(&time[2..4], FIELD_TIME)?;
    let second = parse_two_digits(&time[4..6], FIELD_TIME)?;

    // ddmmyy
    let date = fields[FIELD_DATE];
    if date.len() != 6 {
        return Err(SentenceError::MalformedField { index: FIELD_DATE });
    }
    let day = parse_two_digits(&date[0..2], FIELD_DATE)?;
    let month = parse_two_digits(&date[2..4], FIELD_DATE)?;
    let year = parse_two_digits(&date[4..6], FIELD_DATE)?;

    let datetime = DateTime::new(year, month, day, hour, minute, second)?;
    let latitude = parse_angle(
        fields[FIELD_LATITUDE],
        2,
        FIELD_LATITUDE,
        fields[FIELD_LATITUDE_HEMISPHERE],
        FIELD_LATITUDE_HEMISPHERE,
    )?;
    let longitude = parse_angle(
        fields[FIELD_LONGITUDE],
        3,
        FIELD_LONGITUDE,
        fields[FIELD_LONGITUDE_HEMISPHERE],
        FIELD_LONGITUDE_HEMISPHERE,
    )?;

    Ok(LocationTimeFix::new(datetime, latitude, longitude)?)
}

/// Decode `d..dmm.f..f` where the degrees take `degree_digits` characters.
fn parse_angle(
    field: &[u8],
    degree_digits: usize,
    index: usize,
    hemisphere: &[u8],
    hemisphere_index: usize,
) -> Result<Angle, SentenceError> {
    let dot = degree_digits + 2;
    if field.len() < dot + 2 || field[dot] != b'.' {
        return Err(SentenceError::MalformedField { index });
    }
    let fraction_digits = &field[dot + 1..];
    if fraction_digits.len() > MAX_FRACTION_DIGITS {
        return Err(SentenceError::MalformedField { index });
    }

    let degrees = parse_decimal(&field[..degree_digits], index)?;
    let degrees = u8::try_from(degrees).map_err(|_| SentenceError::MalformedField { index })?;
    let minutes = parse_two_digits(&field[degree_digits..dot], index)?;
    let fraction = parse_decimal(fraction_digits, index)?;
    let scale = 10u32.pow(fraction_digits.len() as u32);

    let hemisphere = match hemisphere {
        [letter] => Hemisphere::from_ascii(*letter)?,
        _ => {
            return Err(SentenceError::MalformedField {
                index: hemisphere_index,
            })
        }
    };

    Ok(Angle::from_fractional_minutes(
        degrees, minutes, fraction, scale, hemisphere,
    )?)
}

fn parse_two_digits(digits: &[u8], index: usize) -> Result<u8, SentenceError> {
    // Two decimal digits always fit in a byte.
    parse_decimal(digits, index).map(|value| value as u8)
}

fn parse_decimal(digits: &[u8], index: usize) -> Result<u32, SentenceError> {
    if digits.is_empty() || digits.len() > 9 {
        return Err(SentenceError::MalformedField { index });
    }
    digits.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(SentenceError::MalformedField { index })
        }
    })
}

/// Two hex digits, nothing else. `from_str_radix` alone would take a sign.
fn parse_hex_byte(digits: &[u8]) -> Option<u8> {
    if digits.len() != 2 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = core::str::from_utf8(digits).ok()?;
    u8::from_str_radix(text, 16).ok()
}

//==================================================================================TEST_GPS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
