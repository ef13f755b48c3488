//! Enrollment state machine
//!
//! Enrolling a fingerprint takes three capture/template cycles with the
//! finger lifted between each. The sequence is driven as a small state
//! machine so each step can recover from the failures that are worth
//! retrying (low-quality captures, finger still resting on the sensor)
//! while genuine communication faults end the attempt.

use tracing::{info, warn};

use gtrust_core::DeviceError;
use gtrust_transport::SerialChannel;

use crate::device::Device;

/// Consecutive not-pressed readings required before the next capture
const REMOVE_FINGER_POLLS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnrollState {
    Start,
    Capture,
    Enroll,
    Complete,
    RemoveFinger,
}

impl<C: SerialChannel> Device<C> {
    /// Enroll one fingerprint at the given ID
    ///
    /// See [`Device::enroll_with_progress`] for the full contract.
    pub fn enroll(&mut self, id: u32) -> bool {
        self.enroll_with_progress(id, |_| {})
    }

    /// Enroll one fingerprint at the given ID, narrating progress
    ///
    /// Blocks until the enrollment completes or fails unrecoverably; the
    /// callback receives short user-facing instructions ("Place finger",
    /// "Remove finger", ...) at each step so any display can be attached.
    /// On failure the reason is available from [`Device::error_code`].
    ///
    /// While waiting for a capture the machine retries without an attempt
    /// bound, on the assumption that the preceding remove-finger wait
    /// saw the finger lifted and a fresh press is coming; only a
    /// communication error breaks the loop. A finger that never arrives
    /// therefore blocks indefinitely.
    pub fn enroll_with_progress(&mut self, id: u32, mut progress: impl FnMut(&str)) -> bool {
        let mut success = true;
        let mut done = false;
        let mut state = EnrollState::Start;

        info!("Beginning enrollment for ID {}", id);
        progress("Beginning enroll");

        while !done {
            match state {
                // Begin enrollment for the requested ID; nothing to
                // recover from if the device refuses
                EnrollState::Start => {
                    if self.start_enrollment(id) {
                        state = EnrollState::RemoveFinger;
                    } else {
                        success = false;
                        done = true;
                    }
                }

                // Capture one fingerprint image
                EnrollState::Capture => {
                    progress("Place finger");

                    if !self.set_cmos_led(true) {
                        success = false;
                        done = true;
                    }

                    if self.capture_fingerprint(true) {
                        state = EnrollState::Enroll;
                    } else if self.error_code() == DeviceError::CommunicationError {
                        success = false;
                        done = true;
                    }
                }

                // Turn the captured image into the template for the
                // current stage
                EnrollState::Enroll => {
                    if !self.set_cmos_led(false) {
                        success = false;
                        done = true;
                    }

                    if self.create_enrollment_template() {
                        if self.session().enrollment_complete() {
                            state = EnrollState::Complete;
                        } else {
                            state = EnrollState::RemoveFinger;
                        }
                    } else {
                        match self.error_code() {
                            DeviceError::EnrollFailed | DeviceError::BadFinger => {
                                state = EnrollState::Capture;
                            }
                            _ => {
                                success = false;
                                done = true;
                            }
                        }
                    }
                }

                EnrollState::Complete => {
                    done = true;
                }

                // Wait for the finger to be lifted before the next capture
                EnrollState::RemoveFinger => {
                    progress("Remove finger");

                    let mut polls = 0;
                    while polls < REMOVE_FINGER_POLLS && !self.is_finger_pressed() {
                        polls += 1;
                    }

                    // The finger must read not-pressed for the full poll
                    // budget; a still-pressed finger re-enters this state,
                    // and a failure other than not-pressed is a real fault
                    if polls == REMOVE_FINGER_POLLS {
                        if self.error_code() == DeviceError::FingerNotPressed {
                            state = EnrollState::Capture;
                        } else {
                            success = false;
                            done = true;
                        }
                    }
                }
            }
        }

        if success {
            info!("Enrollment for ID {} succeeded", id);
            progress("Success!");
        } else {
            warn!("Enrollment for ID {} failed: {}", id, self.error_code());
            progress("Failed to enroll");
        }

        success
    }
}
