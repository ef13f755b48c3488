//! GT-511 packet structures and encoding/decoding

use bytes::Bytes;
use std::fmt;

use crate::{
    checksum, codec,
    command::CommandCode,
    constants::{
        DATA_OVERHEAD, DATA_START, DEVICE_ID, FRAME_CHECKED_LEN, FRAME_SIZE, FRAME_START,
        MAX_DATA_PACKET_SIZE,
    },
    error::{DeviceError, Error, Result},
};

/// Command packet sent from host to device
///
/// # Packet Structure
///
/// ```text
/// ┌───────────┬───────────┬───────────┬───────────┬───────────┐
/// │   Start   │ Device ID │ Parameter │  Command  │ Checksum  │
/// │  2 bytes  │  2 bytes  │  4 bytes  │  2 bytes  │  2 bytes  │
/// │ 0x55 0xAA │ 0x01 0x00 │ (LSB 1st) │ (LSB 1st) │ (LSB 1st) │
/// └───────────┴───────────┴───────────┴───────────┴───────────┘
/// ```
///
/// The parameter, command, and checksum fields land on the wire least
/// significant byte first: the encoder byte-flips each value and then
/// splits it most-significant-first, matching the device's fixed layout.
/// The device ID is likewise emitted LSB first (0x01 then 0x00) despite
/// the nominal ID being 0x0001.
///
/// # Examples
///
/// ```
/// use gtrust_core::{CommandPacket, CommandCode};
///
/// let packet = CommandPacket::new(CommandCode::Open, 0);
/// let bytes = packet.encode();
/// assert_eq!(bytes.len(), 12);
/// assert_eq!(&bytes[..2], &[0x55, 0xAA]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPacket {
    /// Command code
    pub code: CommandCode,

    /// Command parameter
    pub parameter: u32,
}

impl CommandPacket {
    /// Create a new command packet
    pub fn new(code: CommandCode, parameter: u32) -> Self {
        Self { code, parameter }
    }

    /// Encode to the 12-byte wire format
    ///
    /// Assumes the parameter and command are supplied big-endian (the
    /// default for host code) and applies the wire flip.
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        self.encode_with_flip(true)
    }

    /// Encode to the 12-byte wire format, optionally skipping the
    /// parameter/command byte flip for callers that supply the fields
    /// already in wire order.
    pub fn encode_with_flip(&self, flip_fields: bool) -> [u8; FRAME_SIZE] {
        let mut frame = [0u8; FRAME_SIZE];
        frame[0..2].copy_from_slice(&FRAME_START);
        frame[2..4].copy_from_slice(&DEVICE_ID);

        let (param, code) = if flip_fields {
            (codec::flip32(self.parameter), codec::flip16(self.code.into()))
        } else {
            (self.parameter, self.code.into())
        };

        frame[4..8].copy_from_slice(&codec::split32(param));
        frame[8..10].copy_from_slice(&codec::split16(code));

        let sum = checksum::calculate(&frame[..FRAME_CHECKED_LEN]);
        frame[10..12].copy_from_slice(&codec::split16(codec::flip16(sum)));

        frame
    }
}

impl fmt::Display for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandPacket[{}](param=0x{:08X})", self.code, self.parameter)
    }
}

/// Response packet received from the device
///
/// Same 12-byte shape as [`CommandPacket`]; byte 8 holds the ACK (0x30) /
/// NACK (0x31) discriminator and bytes 4..8 the parameter, which is a
/// success value on ACK and an error code on NACK.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ResponsePacket {
    /// Whether the device acknowledged the command
    pub ack: bool,

    /// Response parameter: success value (ACK) or error code (NACK)
    pub parameter: u32,

    /// The raw 12 bytes as received
    pub raw: [u8; FRAME_SIZE],
}

impl ResponsePacket {
    /// Decode a 12-byte response frame
    ///
    /// # Errors
    ///
    /// Returns an error if the frame does not start with the response
    /// marker or its embedded checksum does not match the additive
    /// checksum of the first 10 bytes. A checksum mismatch is the
    /// protocol's communication error.
    pub fn decode(raw: [u8; FRAME_SIZE]) -> Result<Self> {
        if raw[0..2] != FRAME_START {
            return Err(Error::BadStartMarker {
                found: [raw[0], raw[1]],
            });
        }

        let received = codec::join16_le(&raw[10..12]);
        let expected = checksum::calculate(&raw[..FRAME_CHECKED_LEN]);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        // Anything other than an explicit NACK counts as acknowledged
        let ack = raw[8] != CommandCode::Nack as u8;
        let parameter = codec::join32_le(&raw[4..8]);

        Ok(Self { ack, parameter, raw })
    }

    /// Interpret the parameter as a device error code (NACK responses)
    pub fn error(&self) -> Option<DeviceError> {
        if self.ack {
            None
        } else {
            Some(DeviceError::from(self.parameter))
        }
    }
}

impl fmt::Debug for ResponsePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsePacket")
            .field("ack", &self.ack)
            .field("parameter", &format!("0x{:08X}", self.parameter))
            .field("raw", &hex::encode(self.raw))
            .finish()
    }
}

/// Variable-length data packet received from the device
///
/// # Packet Structure
///
/// ```text
/// ┌───────────┬───────────┬───────────┐
/// │   Start   │  Payload  │ Checksum  │
/// │  2 bytes  │  N bytes  │  2 bytes  │
/// │ 0x5A 0xA5 │           │ (LSB 1st) │
/// └───────────┴───────────┴───────────┘
/// ```
///
/// The checksum covers everything except its own two trailing bytes.
/// Used for serial-number and template transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPacket {
    /// Packet payload
    pub payload: Bytes,
}

impl DataPacket {
    /// Maximum total packet size in bytes
    pub const MAX_SIZE: usize = MAX_DATA_PACKET_SIZE;

    /// Total wire size of a data packet carrying `payload_len` bytes
    pub const fn total_size(payload_len: usize) -> usize {
        payload_len + DATA_OVERHEAD
    }

    /// Decode a complete data packet
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than the fixed overhead,
    /// larger than the protocol maximum, does not start with the data
    /// marker, or fails checksum verification. Truncated and corrupted
    /// packets are not distinguished beyond these cases.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < DATA_OVERHEAD {
            return Err(Error::PacketTooShort {
                expected: DATA_OVERHEAD,
                actual: buf.len(),
            });
        }
        if buf.len() > Self::MAX_SIZE {
            return Err(Error::PacketTooLarge {
                size: buf.len(),
                max: Self::MAX_SIZE,
            });
        }
        if buf[0..2] != DATA_START {
            return Err(Error::BadStartMarker {
                found: [buf[0], buf[1]],
            });
        }

        let body_end = buf.len() - 2;
        let received = codec::join16_le(&buf[body_end..]);
        let expected = checksum::calculate(&buf[..body_end]);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        Ok(Self {
            payload: Bytes::copy_from_slice(&buf[2..body_end]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_packet_open() {
        let packet = CommandPacket::new(CommandCode::Open, 0);
        let bytes = packet.encode();

        // 55 AA 01 00 | 00 00 00 00 | 01 00 | chk
        assert_eq!(
            bytes[..10],
            [0x55, 0xAA, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]
        );
        // checksum = 0x55 + 0xAA + 0x01 + 0x01 = 0x0101, low byte first
        assert_eq!(bytes[10..12], [0x01, 0x01]);
    }

    #[test]
    fn test_command_packet_parameter_is_lsb_first() {
        let packet = CommandPacket::new(CommandCode::EnrollStart, 0x12345678);
        let bytes = packet.encode();

        assert_eq!(bytes[4..8], [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(bytes[8..10], [0x22, 0x00]);
    }

    #[test]
    fn test_command_packet_checksum_field() {
        // The checksum field must equal the additive checksum of the
        // first 10 bytes, byte-swapped and split big-endian-first
        for (code, param) in [
            (CommandCode::Open, 0u32),
            (CommandCode::CaptureFinger, 1),
            (CommandCode::DeleteId, 19),
            (CommandCode::Verify, 0xFFFF_FFFF),
        ] {
            let bytes = CommandPacket::new(code, param).encode();
            let sum = checksum::calculate(&bytes[..10]);
            assert_eq!(bytes[10..12], codec::split16(codec::flip16(sum)));
        }
    }

    #[test]
    fn test_command_packet_without_flip() {
        let flipped = CommandPacket::new(CommandCode::Open, 0x01000000).encode_with_flip(false);
        let unflipped = CommandPacket::new(CommandCode::Open, 0x01000000).encode_with_flip(true);

        assert_eq!(flipped[4..8], [0x01, 0x00, 0x00, 0x00]);
        assert_eq!(unflipped[4..8], [0x00, 0x00, 0x00, 0x01]);
    }

    fn response_frame(status: u8, parameter: u32) -> [u8; FRAME_SIZE] {
        let mut frame = [0u8; FRAME_SIZE];
        frame[0..2].copy_from_slice(&FRAME_START);
        frame[2..4].copy_from_slice(&DEVICE_ID);
        frame[4..8].copy_from_slice(&parameter.to_le_bytes());
        frame[8] = status;
        let sum = checksum::calculate(&frame[..10]);
        frame[10..12].copy_from_slice(&sum.to_le_bytes());
        frame
    }

    #[test]
    fn test_response_decode_ack() {
        let frame = response_frame(0x30, 5);
        let packet = ResponsePacket::decode(frame).unwrap();

        assert!(packet.ack);
        assert_eq!(packet.parameter, 5);
        assert_eq!(packet.error(), None);
    }

    #[test]
    fn test_response_decode_nack() {
        let frame = response_frame(0x31, 0x1012);
        let packet = ResponsePacket::decode(frame).unwrap();

        assert!(!packet.ack);
        assert_eq!(packet.error(), Some(DeviceError::FingerNotPressed));
    }

    #[test]
    fn test_response_decode_corrupt_checksum() {
        let mut frame = response_frame(0x30, 5);
        frame[10] ^= 0xFF;

        let result = ResponsePacket::decode(frame);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_response_decode_bad_marker() {
        let mut frame = response_frame(0x30, 0);
        frame[0] = 0x5A;

        let result = ResponsePacket::decode(frame);
        assert!(matches!(result, Err(Error::BadStartMarker { .. })));
    }

    fn data_frame(payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(DataPacket::total_size(payload.len()));
        buf.extend_from_slice(&DATA_START);
        buf.extend_from_slice(payload);
        let sum = checksum::calculate(&buf);
        buf.extend_from_slice(&sum.to_le_bytes());
        buf
    }

    #[test]
    fn test_data_packet_decode() {
        let frame = data_frame(&[1, 2, 3, 4]);
        assert_eq!(frame.len(), DataPacket::total_size(4));

        let packet = DataPacket::decode(&frame).unwrap();
        assert_eq!(packet.payload.as_ref(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_data_packet_corrupt() {
        let mut frame = data_frame(&[1, 2, 3, 4]);
        frame[3] ^= 0x01;

        let result = DataPacket::decode(&frame);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_data_packet_too_short() {
        let result = DataPacket::decode(&[0x5A, 0xA5, 0x00]);
        assert!(matches!(result, Err(Error::PacketTooShort { .. })));
    }
}
