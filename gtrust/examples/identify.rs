//! Fingerprint identification example

use gtrust::{Device, UartChannel};

fn main() -> gtrust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::connect(UartChannel::new(&port))?;

    if !device.open(true) {
        println!("open failed: {}", device.error_code());
        device.disconnect()?;
        return Ok(());
    }

    if device.read_enroll_count() {
        println!("{} fingerprint(s) enrolled", device.response_param());
    }

    device.set_cmos_led(true);
    println!("Place finger on the sensor...");

    while !device.is_finger_pressed() {
        std::thread::sleep(std::time::Duration::from_millis(100));
    }

    if device.capture_fingerprint(false) && device.identify() {
        println!("Matched ID {}", device.response_param());
    } else {
        println!("no match: {}", device.error_code());
    }

    device.set_cmos_led(false);
    device.close();
    device.disconnect()?;

    Ok(())
}
