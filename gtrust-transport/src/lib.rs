//! Transport layer for the GT-511 protocol
//!
//! Provides the blocking serial channel abstraction the driver talks
//! through. The driver owns exactly one channel and accesses it from a
//! single thread of control; implementations do not need to be thread
//! safe.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::UartChannel;

/// Byte-stream channel to the sensor
///
/// Mirrors the capabilities of a UART: open/close at a baud rate, write a
/// buffer, poll for pending bytes, read one byte at a time, and
/// reconfigure the baud rate mid-session. Injecting this trait lets tests
/// substitute a scripted fake for the physical port.
pub trait SerialChannel {
    /// Open the channel at the given baud rate
    fn open(&mut self, baud: u32) -> Result<()>;

    /// Close the channel
    fn close(&mut self) -> Result<()>;

    /// Write raw bytes, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Check whether at least one byte is waiting to be read
    fn available(&mut self) -> bool;

    /// Read a single byte
    fn read(&mut self) -> Result<u8>;

    /// Change the baud rate of an open channel
    fn reconfigure(&mut self, baud: u32) -> Result<()>;
}
