//! Byte codec helpers
//!
//! The GT-511 wire format is assembled by splitting fixed-width integers
//! into big-endian byte order, but the parameter, command, and checksum
//! fields are byte-flipped *before* the split, leaving them
//! least-significant-byte-first on the wire. The flip is a fixed
//! wire-format requirement, not host-endianness correction.

use byteorder::{BigEndian, ByteOrder};

/// Byte-swap a 16-bit value
pub fn flip16(value: u16) -> u16 {
    value.swap_bytes()
}

/// Byte-swap a 32-bit value
pub fn flip32(value: u32) -> u32 {
    value.swap_bytes()
}

/// Split a 16-bit value into bytes, most significant first
pub fn split16(value: u16) -> [u8; 2] {
    let mut buf = [0u8; 2];
    BigEndian::write_u16(&mut buf, value);
    buf
}

/// Split a 32-bit value into bytes, most significant first
pub fn split32(value: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    buf
}

/// Join 4 wire bytes (least significant first) into a 32-bit value
pub fn join32_le(bytes: &[u8]) -> u32 {
    byteorder::LittleEndian::read_u32(bytes)
}

/// Join 2 wire bytes (least significant first) into a 16-bit value
pub fn join16_le(bytes: &[u8]) -> u16 {
    byteorder::LittleEndian::read_u16(bytes)
}
