//! Error types for gtrust-core

/// Result type alias for core protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Packet is too short to be valid
    #[error("Packet too short: expected at least {expected} bytes, got {actual} bytes")]
    PacketTooShort { expected: usize, actual: usize },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch { expected: u16, received: u16 },

    /// Packet does not begin with the expected start marker
    #[error("Bad start marker: got {found:02X?}")]
    BadStartMarker { found: [u8; 2] },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u16),

    /// Data packet exceeds the protocol maximum
    #[error("Data packet too large: {size} bytes (max: {max} bytes)")]
    PacketTooLarge { size: usize, max: usize },
}

/// Device-reported and driver-synthesized error codes
///
/// The device reports errors as the 4-byte parameter of a NACK response.
/// The first two variants never come from the device: `NotReceived` is
/// recorded when the attempt budget runs out without a complete response
/// packet, and `InvalidEnrollmentStage` when a template is requested past
/// the third enrollment stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("no response was received")]
    NotReceived,

    #[error("the enrollment stage is not between 0 and 2, restart the enrollment")]
    InvalidEnrollmentStage,

    #[error("the given ID is not between 0 and 19")]
    InvalidPosition,

    #[error("there is no enrollment for the given ID")]
    IsNotUsed,

    #[error("the given ID is already in use")]
    IsAlreadyUsed,

    #[error("the given checksum does not match the computed checksum")]
    CommunicationError,

    #[error("could not match the fingerprint to the specified enrollment ID")]
    VerifyFailed,

    #[error("the given fingerprint did not match any enrollments")]
    IdentifyFailed,

    #[error("the maximum number of enrolled fingerprints has already been reached")]
    DatabaseFull,

    #[error("there are no enrolled templates on the device")]
    DatabaseEmpty,

    #[error("the recorded fingerprint is of too low quality to be used")]
    BadFinger,

    #[error("failed to enroll the fingerprint")]
    EnrollFailed,

    #[error("did not recognize the given command")]
    NotSupported,

    #[error("the fingerprint sensor has experienced a fatal error")]
    DeviceFault,

    #[error("the given parameter was invalid")]
    InvalidParameter,

    #[error("no finger was detected pressed on the device")]
    FingerNotPressed,

    #[error("the sent packet's header was not recognized")]
    BadHeader,

    #[error("the sent packet's device ID was incorrect (should be 0x0001)")]
    BadId,

    #[error("the sent packet's checksum did not match the checksum computed by the sensor")]
    BadChecksum,

    #[error("unrecognized error")]
    Unrecognized(u32),
}

impl DeviceError {
    /// Get the wire-format error code
    pub fn code(self) -> u32 {
        match self {
            Self::NotReceived => 0x0001,
            Self::InvalidEnrollmentStage => 0x0002,
            Self::InvalidPosition => 0x1003,
            Self::IsNotUsed => 0x1004,
            Self::IsAlreadyUsed => 0x1005,
            Self::CommunicationError => 0x1006,
            Self::VerifyFailed => 0x1007,
            Self::IdentifyFailed => 0x1008,
            Self::DatabaseFull => 0x1009,
            Self::DatabaseEmpty => 0x100A,
            Self::BadFinger => 0x100C,
            Self::EnrollFailed => 0x100D,
            Self::NotSupported => 0x100E,
            Self::DeviceFault => 0x100F,
            Self::InvalidParameter => 0x1011,
            Self::FingerNotPressed => 0x1012,
            Self::BadHeader => 0x1013,
            Self::BadId => 0x1014,
            Self::BadChecksum => 0x1015,
            Self::Unrecognized(code) => code,
        }
    }

    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::NotReceived
                | Self::CommunicationError
                | Self::BadFinger
                | Self::EnrollFailed
                | Self::FingerNotPressed
        )
    }
}

impl From<u32> for DeviceError {
    fn from(code: u32) -> Self {
        match code {
            0x0001 => Self::NotReceived,
            0x0002 => Self::InvalidEnrollmentStage,
            0x1003 => Self::InvalidPosition,
            0x1004 => Self::IsNotUsed,
            0x1005 => Self::IsAlreadyUsed,
            0x1006 => Self::CommunicationError,
            0x1007 => Self::VerifyFailed,
            0x1008 => Self::IdentifyFailed,
            0x1009 => Self::DatabaseFull,
            0x100A => Self::DatabaseEmpty,
            0x100C => Self::BadFinger,
            0x100D => Self::EnrollFailed,
            0x100E => Self::NotSupported,
            0x100F => Self::DeviceFault,
            0x1011 => Self::InvalidParameter,
            0x1012 => Self::FingerNotPressed,
            0x1013 => Self::BadHeader,
            0x1014 => Self::BadId,
            0x1015 => Self::BadChecksum,
            other => Self::Unrecognized(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_roundtrip() {
        for code in [0x0001u32, 0x1003, 0x1006, 0x100C, 0x1012, 0x1015] {
            assert_eq!(DeviceError::from(code).code(), code);
        }
    }

    #[test]
    fn test_device_error_unrecognized() {
        let err = DeviceError::from(0xDEAD_BEEF);
        assert_eq!(err, DeviceError::Unrecognized(0xDEAD_BEEF));
        assert_eq!(err.code(), 0xDEAD_BEEF);
        assert_eq!(err.to_string(), "unrecognized error");
    }

    #[test]
    fn test_device_error_messages() {
        assert_eq!(
            DeviceError::NotReceived.to_string(),
            "no response was received"
        );
        assert_eq!(
            DeviceError::FingerNotPressed.to_string(),
            "no finger was detected pressed on the device"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(DeviceError::BadFinger.is_recoverable());
        assert!(!DeviceError::DeviceFault.is_recoverable());
    }
}
