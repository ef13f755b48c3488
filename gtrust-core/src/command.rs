//! GT-511 protocol command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// All commands from the GT-511 device datasheet. These values are part of
/// the external device contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CommandCode {
    // Device lifecycle
    Open = 0x01,
    Close = 0x02,
    UsbInternalCheck = 0x03,
    ChangeBaudRate = 0x04,
    SetIapMode = 0x05,

    // Sensor control
    CmosLed = 0x12,

    // Enrollment
    GetEnrollCount = 0x20,
    CheckEnrolled = 0x21,
    EnrollStart = 0x22,
    Enroll1 = 0x23,
    Enroll2 = 0x24,
    Enroll3 = 0x25,
    IsPressFinger = 0x26,

    // Responses (from device)
    Ack = 0x30,
    Nack = 0x31,

    // Database operations
    DeleteId = 0x40,
    DeleteAll = 0x41,

    // Matching
    Verify = 0x50,
    Identify = 0x51,
    VerifyTemplate = 0x52,
    IdentifyTemplate = 0x53,

    // Image capture
    CaptureFinger = 0x60,
    MakeTemplate = 0x61,
    GetImage = 0x62,
    GetRawImage = 0x63,

    // Template transfer
    GetTemplate = 0x70,
    SetTemplate = 0x71,
}

impl CommandCode {
    /// Check if this is a request command (from host to device)
    pub fn is_request(self) -> bool {
        !self.is_response()
    }

    /// Check if this is a response command (from device to host)
    pub fn is_response(self) -> bool {
        matches!(self, Self::Ack | Self::Nack)
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "CMD_OPEN",
            Self::Close => "CMD_CLOSE",
            Self::UsbInternalCheck => "CMD_USB_INTERNAL_CHECK",
            Self::ChangeBaudRate => "CMD_CHANGE_BAUDRATE",
            Self::SetIapMode => "CMD_SET_IAP_MODE",
            Self::CmosLed => "CMD_CMOS_LED",
            Self::GetEnrollCount => "CMD_GET_ENROLL_COUNT",
            Self::CheckEnrolled => "CMD_CHECK_ENROLLED",
            Self::EnrollStart => "CMD_ENROLL_START",
            Self::Enroll1 => "CMD_ENROLL1",
            Self::Enroll2 => "CMD_ENROLL2",
            Self::Enroll3 => "CMD_ENROLL3",
            Self::IsPressFinger => "CMD_IS_PRESS_FINGER",
            Self::Ack => "CMD_ACK",
            Self::Nack => "CMD_NACK",
            Self::DeleteId => "CMD_DELETE_ID",
            Self::DeleteAll => "CMD_DELETE_ALL",
            Self::Verify => "CMD_VERIFY",
            Self::Identify => "CMD_IDENTIFY",
            Self::VerifyTemplate => "CMD_VERIFY_TEMPLATE",
            Self::IdentifyTemplate => "CMD_IDENTIFY_TEMPLATE",
            Self::CaptureFinger => "CMD_CAPTURE_FINGER",
            Self::MakeTemplate => "CMD_MAKE_TEMPLATE",
            Self::GetImage => "CMD_GET_IMAGE",
            Self::GetRawImage => "CMD_GET_RAW_IMAGE",
            Self::GetTemplate => "CMD_GET_TEMPLATE",
            Self::SetTemplate => "CMD_SET_TEMPLATE",
        }
    }
}

impl From<CommandCode> for u16 {
    fn from(cmd: CommandCode) -> u16 {
        cmd as u16
    }
}

impl TryFrom<u16> for CommandCode {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Open),
            0x02 => Ok(Self::Close),
            0x03 => Ok(Self::UsbInternalCheck),
            0x04 => Ok(Self::ChangeBaudRate),
            0x05 => Ok(Self::SetIapMode),
            0x12 => Ok(Self::CmosLed),
            0x20 => Ok(Self::GetEnrollCount),
            0x21 => Ok(Self::CheckEnrolled),
            0x22 => Ok(Self::EnrollStart),
            0x23 => Ok(Self::Enroll1),
            0x24 => Ok(Self::Enroll2),
            0x25 => Ok(Self::Enroll3),
            0x26 => Ok(Self::IsPressFinger),
            0x30 => Ok(Self::Ack),
            0x31 => Ok(Self::Nack),
            0x40 => Ok(Self::DeleteId),
            0x41 => Ok(Self::DeleteAll),
            0x50 => Ok(Self::Verify),
            0x51 => Ok(Self::Identify),
            0x52 => Ok(Self::VerifyTemplate),
            0x53 => Ok(Self::IdentifyTemplate),
            0x60 => Ok(Self::CaptureFinger),
            0x61 => Ok(Self::MakeTemplate),
            0x62 => Ok(Self::GetImage),
            0x63 => Ok(Self::GetRawImage),
            0x70 => Ok(Self::GetTemplate),
            0x71 => Ok(Self::SetTemplate),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_conversion() {
        assert_eq!(u16::from(CommandCode::Open), 0x01);
        assert_eq!(CommandCode::try_from(0x01).unwrap(), CommandCode::Open);
        assert_eq!(
            CommandCode::try_from(0x61).unwrap(),
            CommandCode::MakeTemplate
        );
    }

    #[test]
    fn test_command_is_response() {
        assert!(CommandCode::Ack.is_response());
        assert!(CommandCode::Nack.is_response());
        assert!(!CommandCode::Open.is_response());
        assert!(CommandCode::CaptureFinger.is_request());
    }

    #[test]
    fn test_unknown_command() {
        let result = CommandCode::try_from(0x99);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(CommandCode::Open.to_string(), "CMD_OPEN(0x01)");
    }
}
