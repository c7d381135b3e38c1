//! Basic meter readout example

use gqrust::Device;

fn main() -> gqrust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("GMC_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::open(&port)?;

    println!("Device:  {}", device.firmware());
    println!("Serial:  {}", device.serial_number()?);
    println!("Battery: {:.1} V", device.battery_voltage()?);
    println!("CPM:     {}", device.cpm()?);
    println!("CPS:     {}", device.cps()?);

    let config = device.config();
    if device.config_valid() {
        println!();
        println!("Speaker:      {}", if config.speaker_enabled() { "on" } else { "off" });
        println!("Backlight:    {} s", config.backlight_timeout());
        println!("Logging mode: {:?}", config.logging_mode());
        println!("Save cursor:  {:#08x}", config.data_save_address());
        if let Some(saved) = config.save_timestamp().to_naive() {
            println!("Last saved:   {saved}");
        }
    }

    Ok(())
}
