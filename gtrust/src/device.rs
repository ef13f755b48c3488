//! High-level device interface

use std::thread;
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, info, trace, warn};

use gtrust_core::constants::{
    DATA_START, FRAME_SIZE, FRAME_START, MAX_ATTEMPTS, OPEN_INFO_LEN, RETRY_DELAY_MS,
};
use gtrust_core::{CommandCode, CommandPacket, DataPacket, DeviceError, ResponsePacket, Session};
use gtrust_core::DEFAULT_BAUD;
use gtrust_transport::SerialChannel;
use gtrust_types::DeviceInfo;

use crate::error::Result;

/// GT-511 fingerprint sensor
///
/// High-level interface for one sensor attached to one serial channel,
/// used from a single thread of control. Operations are blocking: each
/// one sends a command once, then polls for the response up to the
/// configured attempt bound with a fixed delay between attempts, so the
/// worst-case latency of any call is `attempts * delay`.
///
/// Every operation returns `bool` and records its outcome in the session;
/// after a `false` return, [`Device::error_code`] holds the reason until
/// the next operation overwrites it. Concurrent calls on one device would
/// corrupt that state, which is why the API takes `&mut self` throughout.
pub struct Device<C: SerialChannel> {
    pub(crate) channel: C,
    session: Session,
    data_buf: BytesMut,
    last_data: Option<Bytes>,
    device_info: Option<DeviceInfo>,
    max_attempts: usize,
    retry_delay: Duration,
}

impl<C: SerialChannel> Device<C> {
    /// Take ownership of a channel and open it at the sensor's power-up
    /// baud rate
    pub fn connect(mut channel: C) -> Result<Self> {
        info!("Opening serial channel at {} baud...", DEFAULT_BAUD);
        channel.open(DEFAULT_BAUD)?;

        Ok(Self {
            channel,
            session: Session::new(),
            data_buf: BytesMut::new(),
            last_data: None,
            device_info: None,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Close the channel and consume the device
    pub fn disconnect(mut self) -> Result<()> {
        info!("Closing serial channel");
        self.channel.close()?;
        Ok(())
    }

    /// Set the number of receive attempts per command
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the delay between receive attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    // Session accessors

    /// Whether the last response was successfully received and acknowledged
    pub fn response_status(&self) -> bool {
        self.session.status()
    }

    /// Parameter of the last response
    ///
    /// Only meaningful immediately after an operation; every operation
    /// overwrites it.
    pub fn response_param(&self) -> u32 {
        self.session.parameter()
    }

    /// The last response parameter viewed as an error code
    ///
    /// Same underlying value as [`Device::response_param`], provided for
    /// readability after a failed call. The `Display` impl carries the
    /// human-readable message.
    pub fn error_code(&self) -> DeviceError {
        self.session.error()
    }

    /// Current enrollment stage (0 to 3)
    pub fn enrollment_stage(&self) -> u8 {
        self.session.enrollment_stage()
    }

    /// Device information captured by a successful `open(true)`
    pub fn device_info(&self) -> Option<&DeviceInfo> {
        self.device_info.as_ref()
    }

    /// Payload of the last successfully received data packet
    pub fn last_data(&self) -> Option<&Bytes> {
        self.last_data.as_ref()
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    // Device operations

    /// Initialize the fingerprint module
    ///
    /// With `extra_check` set the sensor follows the ACK with a data
    /// packet carrying its firmware version and serial number; the open
    /// is treated as failed if that packet is missing or the serial
    /// number is all zeros.
    pub fn open(&mut self, extra_check: bool) -> bool {
        let mut success = self.execute(CommandCode::Open, u32::from(extra_check));

        if extra_check && success {
            success = self.recv_data(OPEN_INFO_LEN);

            if success {
                success = match DeviceInfo::from_payload(self.last_data.as_deref().unwrap_or(&[]))
                {
                    Ok(info) if !info.serial_number_is_blank() => {
                        info!("Connected to {}", info);
                        self.device_info = Some(info);
                        true
                    }
                    Ok(_) => {
                        warn!("Device returned a blank serial number");
                        false
                    }
                    Err(e) => {
                        warn!("Device information rejected: {}", e);
                        false
                    }
                };
            }
        }

        if !self.session.status() {
            debug!("Open operation failed: {}", self.session.error());
        } else {
            debug!("Open operation succeeded");
        }

        success
    }

    /// Terminate the fingerprint module
    pub fn close(&mut self) -> bool {
        let success = self.execute(CommandCode::Close, 0);
        self.log_outcome("Close", success);
        success
    }

    /// Turn the CMOS LED on or off
    pub fn set_cmos_led(&mut self, on: bool) -> bool {
        let success = self.execute(CommandCode::CmosLed, u32::from(on));
        self.log_outcome("CMOS LED", success);
        success
    }

    /// Change the UART baud rate
    ///
    /// Sends the command, reconfigures the local channel to match, and
    /// then polls for the response at the new rate.
    pub fn change_baud_rate(&mut self, baud: u32) -> bool {
        if !self.send(CommandCode::ChangeBaudRate, baud) {
            warn!("Short write sending {}", CommandCode::ChangeBaudRate);
        }

        if let Err(e) = self.channel.reconfigure(baud) {
            warn!("Failed to reconfigure channel to {} baud: {}", baud, e);
        }

        self.poll_response();
        let success = self.session.status();
        self.log_outcome("Baud rate change", success);
        success
    }

    /// Get the number of enrolled fingerprints
    ///
    /// On success the count is available from [`Device::response_param`].
    pub fn read_enroll_count(&mut self) -> bool {
        let success = self.execute(CommandCode::GetEnrollCount, 0);
        self.log_outcome("Get enrollment count", success);
        success
    }

    /// Check whether the given ID is enrolled
    ///
    /// Returns `false` both when the ID is not enrolled and on a
    /// communications fault; check [`Device::error_code`] to tell the two
    /// apart.
    pub fn is_id_enrolled(&mut self, id: u32) -> bool {
        let success = self.execute(CommandCode::CheckEnrolled, id);
        self.log_outcome("Enrollment check", success);
        success
    }

    /// Begin an enrollment for the given ID
    ///
    /// Resets the enrollment stage counter on success.
    pub fn start_enrollment(&mut self, id: u32) -> bool {
        let success = self.execute(CommandCode::EnrollStart, id);

        if success {
            self.session.reset_enrollment();
            debug!("Began enrollment for ID {}", id);
        } else {
            debug!(
                "Could not begin enrollment for ID {}: {}",
                id,
                self.session.error()
            );
        }

        success
    }

    /// Make the enrollment template for the current stage
    ///
    /// Dispatches ENROLL1/ENROLL2/ENROLL3 from the stage counter and
    /// increments it on success. Calling past the third stage is the
    /// synthetic invalid-enrollment-stage failure; no command is sent.
    pub fn create_enrollment_template(&mut self) -> bool {
        let code = match self.session.enrollment_stage() {
            0 => CommandCode::Enroll1,
            1 => CommandCode::Enroll2,
            2 => CommandCode::Enroll3,
            _ => {
                self.session.record_failure(DeviceError::InvalidEnrollmentStage);
                return false;
            }
        };

        let success = self.execute(code, 0);

        if success {
            self.session.advance_enrollment();
            debug!(
                "Registered image #{} of the enrollment",
                self.session.enrollment_stage()
            );
        } else {
            debug!("Template creation failed: {}", self.session.error());
        }

        success
    }

    /// Check whether a finger is on the sensor
    ///
    /// The device reports presence through the parameter of an ACK (zero
    /// means pressed); a non-zero parameter is normalized into the
    /// finger-not-pressed failure so callers see the same vocabulary as
    /// everywhere else.
    pub fn is_finger_pressed(&mut self) -> bool {
        let mut pressed = self.execute(CommandCode::IsPressFinger, 0);

        if pressed && self.session.parameter() != 0 {
            self.session.record_failure(DeviceError::FingerNotPressed);
            pressed = false;
        }

        self.log_outcome("Finger presence check", pressed);
        pressed
    }

    /// Capture a fingerprint image into the sensor's RAM
    ///
    /// A high-quality capture is slower but required for enrollment.
    pub fn capture_fingerprint(&mut self, high_quality: bool) -> bool {
        let success = self.execute(CommandCode::CaptureFinger, u32::from(high_quality));
        self.log_outcome("Capture", success);
        success
    }

    /// Delete the template with the given ID
    pub fn delete_id(&mut self, id: u32) -> bool {
        let success = self.execute(CommandCode::DeleteId, id);
        self.log_outcome("Delete", success);
        success
    }

    /// Delete all templates
    pub fn delete_all(&mut self) -> bool {
        let success = self.execute(CommandCode::DeleteAll, 0);
        self.log_outcome("Delete all", success);
        success
    }

    /// 1:1 verification of the captured fingerprint against one template
    ///
    /// Must follow a successful [`Device::capture_fingerprint`] call.
    pub fn verify(&mut self, id: u32) -> bool {
        let success = self.execute(CommandCode::Verify, id);
        self.log_outcome("Verify", success);
        success
    }

    /// 1:N identification of the captured fingerprint
    ///
    /// On success the matched ID is available from
    /// [`Device::response_param`]. Must follow a successful
    /// [`Device::capture_fingerprint`] call.
    pub fn identify(&mut self) -> bool {
        let success = self.execute(CommandCode::Identify, 0);
        self.log_outcome("Identify", success);
        success
    }

    // Transport internals

    /// Send a command and poll for its response
    ///
    /// The send result is deliberately not retried here: a short write
    /// surfaces as a missing response and the polling loop's attempt
    /// budget is the single recovery mechanism.
    fn execute(&mut self, code: CommandCode, parameter: u32) -> bool {
        if !self.send(code, parameter) {
            warn!("Short write sending {}", code);
        }

        self.poll_response();
        self.session.status()
    }

    /// Encode and write one command packet, returning whether all 12
    /// bytes were accepted by the channel
    fn send(&mut self, code: CommandCode, parameter: u32) -> bool {
        let frame = CommandPacket::new(code, parameter).encode();

        trace!("Sending command packet: {}", hex::encode(frame));

        match self.channel.write(&frame) {
            Ok(written) => written == frame.len(),
            Err(e) => {
                warn!("Channel write failed: {}", e);
                false
            }
        }
    }

    /// Call [`Device::recv_response`] up to the attempt bound with the
    /// configured delay between attempts
    fn poll_response(&mut self) -> bool {
        for _ in 0..self.max_attempts {
            if self.recv_response() {
                return true;
            }
            thread::sleep(self.retry_delay);
        }
        false
    }

    /// Scan the channel for one complete response packet
    ///
    /// Bytes are consumed one at a time; anything before the two-byte
    /// start marker is discarded, which resynchronizes the stream after
    /// stray or corrupted bytes. A marker byte inside a packet body is
    /// not treated specially: the scan only restarts at the outer byte
    /// level, a deliberate compatibility quirk of this protocol.
    ///
    /// Returns whether a complete 12-byte packet was collected, which is
    /// distinct from whether it was valid: a checksum mismatch or NACK
    /// still counts as received and is recorded in the session.
    fn recv_response(&mut self) -> bool {
        let mut frame = [0u8; FRAME_SIZE];
        let mut done = false;

        while !done && self.channel.available() {
            let Ok(byte) = self.channel.read() else { break };
            if byte != FRAME_START[0] {
                continue;
            }
            let second = match self.channel.read() {
                Ok(b) => b,
                Err(_) => break,
            };
            if second != FRAME_START[1] {
                continue;
            }

            frame[0..2].copy_from_slice(&FRAME_START);
            let mut filled = 2;
            while filled < FRAME_SIZE && self.channel.available() {
                match self.channel.read() {
                    Ok(b) => {
                        frame[filled] = b;
                        filled += 1;
                    }
                    Err(_) => break,
                }
            }

            if filled == FRAME_SIZE {
                done = true;
            }
        }

        if !done {
            trace!("Did not receive a complete response packet");
            self.session.record_failure(DeviceError::NotReceived);
            return false;
        }

        trace!("Received response packet: {}", hex::encode(frame));

        match ResponsePacket::decode(frame) {
            Ok(packet) => self.session.record_response(&packet),
            Err(e) => {
                debug!("Response packet rejected: {}", e);
                self.session.record_failure(DeviceError::CommunicationError);
            }
        }

        true
    }

    /// Scan the channel for one complete data packet of the given
    /// payload size
    ///
    /// Same resynchronization strategy as [`Device::recv_response`] with
    /// the data start marker. Truncated and corrupted packets are
    /// reported identically as `false`.
    fn recv_data(&mut self, payload_len: usize) -> bool {
        let total = DataPacket::total_size(payload_len);
        if total > DataPacket::MAX_SIZE {
            warn!(
                "Requested data packet of {} bytes exceeds protocol maximum of {}",
                total,
                DataPacket::MAX_SIZE
            );
            return false;
        }

        let mut done = false;

        while !done && self.channel.available() {
            let Ok(byte) = self.channel.read() else { break };
            if byte != DATA_START[0] {
                continue;
            }
            let second = match self.channel.read() {
                Ok(b) => b,
                Err(_) => break,
            };
            if second != DATA_START[1] {
                continue;
            }

            self.data_buf.clear();
            self.data_buf.reserve(total);
            self.data_buf.put_slice(&DATA_START);
            while self.data_buf.len() < total && self.channel.available() {
                match self.channel.read() {
                    Ok(b) => self.data_buf.put_u8(b),
                    Err(_) => break,
                }
            }

            if self.data_buf.len() == total {
                done = true;
            }
        }

        if !done {
            trace!("Did not receive a complete data packet");
            return false;
        }

        match DataPacket::decode(&self.data_buf) {
            Ok(packet) => {
                trace!("Received data packet ({} bytes)", total);
                self.last_data = Some(packet.payload);
                true
            }
            Err(e) => {
                debug!("Data packet rejected: {}", e);
                false
            }
        }
    }

    fn log_outcome(&self, operation: &str, success: bool) {
        if success {
            debug!("{} operation succeeded", operation);
        } else {
            debug!("{} operation failed: {}", operation, self.session.error());
        }
    }
}
