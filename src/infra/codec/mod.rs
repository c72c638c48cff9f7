//! Byte-level codec primitives for fixed-layout wire frames.
pub mod cursor;
