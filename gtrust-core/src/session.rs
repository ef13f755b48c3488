//! Session state for a single attached sensor
//!
//! A session tracks the outcome of the most recent operation (status flag
//! plus response parameter) and the enrollment stage counter. The status
//! and parameter are only meaningful immediately after an operation; every
//! operation overwrites them in place. The driver is single-threaded by
//! design, so the session carries no locking.

use crate::constants::FRAME_SIZE;
use crate::error::DeviceError;
use crate::packet::ResponsePacket;

/// Number of template captures required to complete an enrollment
pub const ENROLLMENT_STAGES: u8 = 3;

/// Per-device session state
#[derive(Debug, Clone)]
pub struct Session {
    /// Whether the last response was an ACK
    status: bool,

    /// Last response parameter, or the recorded error code
    parameter: u32,

    /// 0-based count of completed enrollment template captures
    enrollment_stage: u8,

    /// Raw bytes of the last acknowledged response
    last_response: Option<[u8; FRAME_SIZE]>,
}

impl Session {
    /// Create a fresh session with no recorded response
    pub fn new() -> Self {
        Self {
            status: false,
            parameter: 0,
            enrollment_stage: 0,
            last_response: None,
        }
    }

    /// Whether the last operation's response was an ACK
    pub fn status(&self) -> bool {
        self.status
    }

    /// Last response parameter (success value or error code)
    pub fn parameter(&self) -> u32 {
        self.parameter
    }

    /// Last response parameter viewed as a device error code
    pub fn error(&self) -> DeviceError {
        DeviceError::from(self.parameter)
    }

    /// Raw bytes of the last acknowledged response, if any
    pub fn last_response(&self) -> Option<&[u8; FRAME_SIZE]> {
        self.last_response.as_ref()
    }

    /// Current enrollment stage (0 to 3)
    pub fn enrollment_stage(&self) -> u8 {
        self.enrollment_stage
    }

    /// Whether all three enrollment captures have completed
    pub fn enrollment_complete(&self) -> bool {
        self.enrollment_stage == ENROLLMENT_STAGES
    }

    /// Record a fully parsed response packet
    ///
    /// An ACK persists the raw frame and success parameter; a NACK records
    /// the device's error code.
    pub fn record_response(&mut self, packet: &ResponsePacket) {
        self.status = packet.ack;
        self.parameter = packet.parameter;
        if packet.ack {
            self.last_response = Some(packet.raw);
        }
    }

    /// Record a failure detected by the driver itself rather than
    /// reported by the device
    pub fn record_failure(&mut self, error: DeviceError) {
        self.status = false;
        self.parameter = error.code();
    }

    /// Reset the enrollment stage counter (on successful enroll start)
    pub fn reset_enrollment(&mut self) {
        self.enrollment_stage = 0;
    }

    /// Advance the enrollment stage after a successful template capture
    pub fn advance_enrollment(&mut self) {
        self.enrollment_stage += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
