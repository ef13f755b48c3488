//! Protocol constants

/// Command/response packet start marker
pub const FRAME_START: [u8; 2] = [0x55, 0xAA];

/// Data packet start marker
pub const DATA_START: [u8; 2] = [0x5A, 0xA5];

/// Device ID as emitted on the wire (LSB first, nominal ID 0x0001)
pub const DEVICE_ID: [u8; 2] = [0x01, 0x00];

/// Command and response packet size in bytes
pub const FRAME_SIZE: usize = 12;

/// Number of bytes covered by the command/response checksum
pub const FRAME_CHECKED_LEN: usize = 10;

/// Non-payload bytes of a data packet (start marker + checksum)
pub const DATA_OVERHEAD: usize = 4;

/// Maximum total size of a data packet in bytes
pub const MAX_DATA_PACKET_SIZE: usize = 51846;

/// Length of the device information payload returned by the open command
pub const OPEN_INFO_LEN: usize = 24;

/// Default number of receive attempts per command
///
/// The documented worst-case execution time for a command is
/// `MAX_ATTEMPTS * RETRY_DELAY_MS` milliseconds.
pub const MAX_ATTEMPTS: usize = 11;

/// Default delay between receive attempts, in milliseconds
pub const RETRY_DELAY_MS: u64 = 500;
