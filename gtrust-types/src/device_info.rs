//! Device information structures

use std::fmt;

use crate::error::{Error, Result};

/// Length of the device information payload sent after the open command
pub const OPEN_INFO_LEN: usize = 24;

/// Device information reported by the open command
///
/// When the open command is sent with its extra-information parameter set,
/// the sensor follows the ACK with a 24-byte data packet: firmware version
/// (4 bytes LE), ISO area maximum size (4 bytes LE), and a 16-byte serial
/// number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Firmware version
    pub firmware_version: u32,

    /// Maximum size of the ISO area
    pub iso_area_max_size: u32,

    /// Device serial number
    pub serial_number: [u8; 16],
}

impl DeviceInfo {
    /// Parse device information from the open data packet payload
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        if payload.len() != OPEN_INFO_LEN {
            return Err(Error::Parse(format!(
                "device info payload must be {} bytes, got {}",
                OPEN_INFO_LEN,
                payload.len()
            )));
        }

        let mut serial_number = [0u8; 16];
        serial_number.copy_from_slice(&payload[8..24]);

        Ok(Self {
            firmware_version: u32::from_le_bytes(payload[0..4].try_into().unwrap()),
            iso_area_max_size: u32::from_le_bytes(payload[4..8].try_into().unwrap()),
            serial_number,
        })
    }

    /// Serial number as a hex string
    pub fn serial_number_hex(&self) -> String {
        hex::encode(self.serial_number)
    }

    /// Whether the serial number is all zeros
    ///
    /// A zeroed serial number indicates the module did not return real
    /// identity data and the open should be treated as failed.
    pub fn serial_number_is_blank(&self) -> bool {
        self.serial_number.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device[SN: {}, FW: 0x{:08X}]",
            self.serial_number_hex(),
            self.firmware_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload() -> Vec<u8> {
        let mut buf = Vec::with_capacity(OPEN_INFO_LEN);
        buf.extend_from_slice(&0x0103u32.to_le_bytes());
        buf.extend_from_slice(&498u32.to_le_bytes());
        buf.extend_from_slice(&[0xAB; 16]);
        buf
    }

    #[test]
    fn test_device_info_parse() {
        let info = DeviceInfo::from_payload(&payload()).unwrap();

        assert_eq!(info.firmware_version, 0x0103);
        assert_eq!(info.iso_area_max_size, 498);
        assert_eq!(info.serial_number, [0xAB; 16]);
        assert!(!info.serial_number_is_blank());
    }

    #[test]
    fn test_device_info_wrong_length() {
        let result = DeviceInfo::from_payload(&[0u8; 12]);
        assert!(result.is_err());
    }

    #[test]
    fn test_device_info_blank_serial() {
        let mut buf = payload();
        buf[8..24].fill(0);

        let info = DeviceInfo::from_payload(&buf).unwrap();
        assert!(info.serial_number_is_blank());
    }

    #[test]
    fn test_device_info_display() {
        let info = DeviceInfo::from_payload(&payload()).unwrap();
        let text = info.to_string();

        assert!(text.contains("abababab"));
        assert!(text.contains("0x00000103"));
    }
}
