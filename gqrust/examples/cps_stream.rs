//! Live CPS streaming example

use gqrust::Device;

fn main() -> gqrust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("GMC_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let device = Device::open(&port)?;
    let mut stream = device.start_streaming()?;

    println!("Streaming CPS for 10 seconds...");
    let mut taken = 0;
    for _ in 0..40 {
        if taken == 10 {
            break;
        }
        // The feed ticks once a second; a timed-out read just means
        // the next beat has not arrived yet.
        match stream.sample() {
            Ok(cps) => {
                taken += 1;
                println!("CPS: {cps}");
            }
            Err(err) => println!("(waiting: {err})"),
        }
    }

    let device = stream.stop()?;
    println!("Stream stopped, device back to {}", device.firmware());

    Ok(())
}
