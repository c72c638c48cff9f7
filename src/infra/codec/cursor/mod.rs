//! Byte cursors used to lay out and read back fixed wire frames.
//! Multi-byte fields are little-endian, matching the packed layout of the
//! node's microcontroller.
use crate::error::CodecError;

/// Reader that walks a `&[u8]` field by field without copies.
pub struct ByteReader<'a> {
    /// Shared source buffer (typically a received frame).
    buffer: &'a [u8],
    /// Number of bytes consumed from the beginning.
    cursor: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of the provided buffer.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let available = self.buffer.len() - self.cursor;
        if len > available {
            return Err(CodecError::OutOfBounds {
                asked: len,
                available,
            });
        }
        let slice = &self.buffer[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        self.read_slice(1).map(|bytes| bytes[0])
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        self.read_slice(2)
            .map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian two's-complement `i16`.
    pub fn read_i16(&mut self) -> Result<i16, CodecError> {
        self.read_u16().map(|raw| raw as i16)
    }

    /// Skip `len` bytes (reserved header fields).
    pub fn skip(&mut self, len: usize) -> Result<(), CodecError> {
        self.read_slice(len).map(|_| ())
    }
}
//==================================================================================BYTEWRITER

/// Writer laying fields into a `&mut [u8]` in order.
pub struct ByteWriter<'a> {
    /// Target buffer (typically the frame under construction).
    buffer: &'a mut [u8],
    /// Number of bytes written so far.
    cursor: usize,
}

impl<'a> ByteWriter<'a> {
    /// Create a writer positioned at the start of the buffer.
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Bytes written so far (useful to derive final length).
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Copy `slice` at the cursor.
    pub fn write_slice(&mut self, slice: &[u8]) -> Result<(), CodecError> {
        let available = self.buffer.len() - self.cursor;
        if slice.len() > available {
            return Err(CodecError::OutOfBounds {
                asked: slice.len(),
                available,
            });
        }
        self.buffer[self.cursor..self.cursor + slice.len()].copy_from_slice(slice);
        self.cursor += slice.len();
        Ok(())
    }

    /// Write one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.write_slice(&[value])
    }

    /// Write a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.write_slice(&value.to_le_bytes())
    }

    /// Write a little-endian two's-complement `i16`.
    pub fn write_i16(&mut self, value: i16) -> Result<(), CodecError> {
        self.write_slice(&value.to_le_bytes())
    }
}
