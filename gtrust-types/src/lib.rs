//! Type definitions for gtrust

pub mod device_info;
pub mod error;

pub use device_info::DeviceInfo;
pub use error::{Error, Result};
