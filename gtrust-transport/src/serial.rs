//! UART channel backed by a host serial port

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, trace, warn};

use crate::{error::*, SerialChannel};

/// Serial port channel to a GT-511 sensor
pub struct UartChannel {
    path: String,
    port: Option<Box<dyn SerialPort>>,
    read_timeout: Duration,
}

impl UartChannel {
    /// Create a new channel for the given port path (e.g. `/dev/ttyUSB0`)
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            port: None,
            read_timeout: Duration::from_millis(50),
        }
    }

    /// Set the per-byte read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Get the configured port path
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SerialChannel for UartChannel {
    fn open(&mut self, baud: u32) -> Result<()> {
        if self.port.is_some() {
            return Err(Error::AlreadyOpen);
        }

        debug!("Opening {} at {} baud...", self.path, baud);

        let port = serialport::new(&self.path, baud)
            .timeout(self.read_timeout)
            .open()?;

        debug!("Opened {}", self.path);

        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(port) = self.port.take() {
            debug!("Closing {}...", self.path);
            drop(port);
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotOpen)?;

        trace!("Writing {} bytes: {:02X?}", data.len(), data);

        let written = port.write(data)?;
        port.flush()?;

        Ok(written)
    }

    fn available(&mut self) -> bool {
        match self.port.as_mut() {
            Some(port) => port.bytes_to_read().map(|n| n > 0).unwrap_or(false),
            None => false,
        }
    }

    fn read(&mut self) -> Result<u8> {
        let port = self.port.as_mut().ok_or(Error::NotOpen)?;

        let mut byte = [0u8; 1];
        port.read_exact(&mut byte)?;

        Ok(byte[0])
    }

    fn reconfigure(&mut self, baud: u32) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotOpen)?;

        debug!("Reconfiguring {} to {} baud", self.path, baud);

        port.flush()?;
        port.set_baud_rate(baud)?;

        Ok(())
    }
}

impl Drop for UartChannel {
    fn drop(&mut self) {
        if self.port.is_some() {
            warn!("UART channel dropped while still open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uart_channel_create() {
        let channel = UartChannel::new("/dev/ttyUSB0");
        assert_eq!(channel.path(), "/dev/ttyUSB0");
    }

    #[test]
    fn test_uart_channel_not_open() {
        let mut channel = UartChannel::new("/dev/ttyUSB0");

        assert!(!channel.available());
        assert!(matches!(channel.read(), Err(Error::NotOpen)));
        assert!(matches!(channel.write(&[0x55]), Err(Error::NotOpen)));
        assert!(matches!(channel.reconfigure(115200), Err(Error::NotOpen)));
    }

    #[test]
    fn test_uart_channel_close_when_never_opened() {
        let mut channel = UartChannel::new("/dev/ttyUSB0");
        assert!(channel.close().is_ok());
    }
}
