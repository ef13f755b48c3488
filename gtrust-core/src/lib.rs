//! # gtrust-core
//!
//! Core protocol implementation for the ADH Technology GT-511 fingerprint
//! sensor family.
//!
//! This crate provides the low-level protocol primitives:
//! - Byte codec (endianness flips and big-endian splits)
//! - Additive checksum calculation
//! - Command code and device error code definitions
//! - Packet encoding/decoding (command, response, data)
//! - Session state (last response, enrollment stage)

pub mod checksum;
pub mod codec;
pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod session;

pub use command::CommandCode;
pub use error::{DeviceError, Error, Result};
pub use packet::{CommandPacket, DataPacket, ResponsePacket};
pub use session::Session;

/// Protocol version information
pub const PROTOCOL_VERSION: &str = "1.0";

/// Default UART baud rate on power-up
pub const DEFAULT_BAUD: u32 = 9600;
