//! History flash dump example
//!
//! Reads the logged history up to the device's current save cursor
//! and prints the decoded records.

use gqrust::{Device, HistoryRecord};

// The protocol caps one history read at 4096 bytes.
const CHUNK: u16 = 0x1000;

fn main() -> gqrust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("GMC_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::open(&port)?;
    // The cursor lives in the config block; cap it at the 64 KiB the
    // flash actually holds.
    let end = device.config().data_save_address().min(0x1_0000);
    println!("History in use: {end:#08x} bytes");

    let mut raw = Vec::new();
    let mut address = 0u32;
    while address < end {
        let length = (end - address).min(u32::from(CHUNK)) as u16;
        raw.extend(device.read_history(address, length)?);
        address += u32::from(length);
    }

    for record in gqrust::history::decode(&raw) {
        match record {
            HistoryRecord::Timestamp { datetime, mode } => {
                println!("--- {datetime} (mode {mode:?}) ---");
            }
            HistoryRecord::Sample { value, .. } => println!("{value}"),
            HistoryRecord::Label(text) => println!("[{text}]"),
        }
    }

    Ok(())
}
