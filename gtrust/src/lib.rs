//! # gtrust
//!
//! Driver for the ADH Technology GT-511 family of UART fingerprint
//! sensor modules.
//!
//! ## Features
//!
//! - Bit-exact implementation of the GT-511 framed binary protocol
//! - Blocking, single-threaded API suitable for one sensor on one port
//! - Enrollment state machine with user-facing progress callbacks
//! - Channel abstraction for deterministic testing without hardware
//!
//! ## Quick Start
//!
//! ```no_run
//! use gtrust::{Device, UartChannel};
//!
//! fn main() -> gtrust::Result<()> {
//!     // Connect to the sensor (powers up at 9600 baud)
//!     let mut device = Device::connect(UartChannel::new("/dev/ttyUSB0"))?;
//!
//!     if device.open(true) {
//!         if let Some(info) = device.device_info() {
//!             println!("{}", info);
//!         }
//!
//!         // Enroll a fingerprint at ID 0
//!         device.enroll_with_progress(0, |msg| println!("{}", msg));
//!     } else {
//!         println!("open failed: {}", device.error_code());
//!     }
//!
//!     device.close();
//!     device.disconnect()?;
//!     Ok(())
//! }
//! ```
//!
//! Every device operation returns a `bool`; on failure the reason is
//! available from [`Device::error_code`] until the next operation
//! overwrites it.

pub mod device;
mod enroll;
pub mod error;

#[cfg(test)]
pub(crate) mod test_channel;

// Re-exports
pub use device::Device;
pub use error::{Error, Result};

// Re-export types
pub use gtrust_core::{CommandCode, DeviceError, Session};
pub use gtrust_transport::{SerialChannel, UartChannel};
pub use gtrust_types::DeviceInfo;
