//! Scripted serial channel for driver tests
//!
//! Plays back canned device traffic: each write pops the next scripted
//! byte stream and makes it readable, which is enough to simulate the
//! sensor's strict command/response lockstep without hardware.

use std::collections::VecDeque;
use std::io;

use gtrust_core::constants::{DATA_START, DEVICE_ID, FRAME_SIZE, FRAME_START};
use gtrust_core::{checksum, DeviceError};
use gtrust_transport::{Error, Result, SerialChannel};

pub struct ScriptedChannel {
    /// Bytes currently readable
    pub rx: VecDeque<u8>,

    /// Every buffer the driver wrote, in order
    pub written: Vec<Vec<u8>>,

    /// Byte streams to feed back, one per write
    pub responses: VecDeque<Vec<u8>>,

    /// Cap on bytes accepted per write, to simulate short writes
    pub accept: Option<usize>,

    /// Last baud rate passed to open/reconfigure
    pub baud: Option<u32>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            written: Vec::new(),
            responses: VecDeque::new(),
            accept: None,
            baud: None,
        }
    }

    /// Queue a byte stream to be fed back after the next unanswered write
    pub fn push_response(&mut self, stream: Vec<u8>) {
        self.responses.push_back(stream);
    }
}

impl SerialChannel for ScriptedChannel {
    fn open(&mut self, baud: u32) -> Result<()> {
        self.baud = Some(baud);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.written.push(data.to_vec());
        if let Some(stream) = self.responses.pop_front() {
            self.rx.extend(stream);
        }
        Ok(self.accept.unwrap_or(data.len()).min(data.len()))
    }

    fn available(&mut self) -> bool {
        !self.rx.is_empty()
    }

    fn read(&mut self) -> Result<u8> {
        self.rx.pop_front().ok_or_else(|| {
            Error::Io(io::Error::new(io::ErrorKind::TimedOut, "channel dry"))
        })
    }

    fn reconfigure(&mut self, baud: u32) -> Result<()> {
        self.baud = Some(baud);
        Ok(())
    }
}

/// Build a well-formed response frame with the given status byte
fn response_frame(status: u8, parameter: u32) -> Vec<u8> {
    let mut frame = vec![0u8; FRAME_SIZE];
    frame[0..2].copy_from_slice(&FRAME_START);
    frame[2..4].copy_from_slice(&DEVICE_ID);
    frame[4..8].copy_from_slice(&parameter.to_le_bytes());
    frame[8] = status;
    let sum = checksum::calculate(&frame[..10]);
    frame[10..12].copy_from_slice(&sum.to_le_bytes());
    frame
}

/// A well-formed ACK response carrying the given parameter
pub fn ack_frame(parameter: u32) -> Vec<u8> {
    response_frame(0x30, parameter)
}

/// A well-formed NACK response carrying the given error code
pub fn nack_frame(error: DeviceError) -> Vec<u8> {
    response_frame(0x31, error.code())
}

/// A well-formed data packet around the given payload
pub fn data_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.extend_from_slice(&DATA_START);
    frame.extend_from_slice(payload);
    let sum = checksum::calculate(&frame);
    frame.extend_from_slice(&sum.to_le_bytes());
    frame
}
