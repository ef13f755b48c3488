//! Fingerprint enrollment example

use gtrust::{Device, UartChannel};

fn main() -> gtrust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let id: u32 = std::env::var("ENROLL_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut device = Device::connect(UartChannel::new(&port))?;

    if !device.open(true) {
        println!("open failed: {}", device.error_code());
        device.disconnect()?;
        return Ok(());
    }

    if let Some(info) = device.device_info() {
        println!("Connected: {}", info);
    }

    if device.is_id_enrolled(id) {
        println!("ID {} is already enrolled, deleting it first", id);
        device.delete_id(id);
    }

    if device.enroll_with_progress(id, |msg| println!("{}", msg)) {
        println!("ID {} enrolled", id);
    } else {
        println!("enrollment failed: {}", device.error_code());
    }

    device.close();
    device.disconnect()?;

    Ok(())
}
