//! Once-a-second CPS streaming
//!
//! With the heartbeat switched on the device writes a two-byte CPS
//! reading every second, unprompted. The feed carries no framing, and
//! a streaming device cannot tell sample bytes from command replies,
//! so the stream holds the [`Device`] exclusively until stopped.

use tracing::{info, warn};

use gqrust_core::command::Command;

use crate::device::Device;
use crate::error::{Error, Result};

/// Exclusive handle on a device with the CPS feed running.
///
/// Obtained from [`Device::start_streaming`]; [`CpsStream::stop`]
/// switches the feed off and hands the device back.
pub struct CpsStream {
    device: Option<Device>,
}

impl CpsStream {
    pub(crate) fn start(mut device: Device) -> Result<Self> {
        info!("starting CPS stream");
        device.exchange(&Command::HeartbeatOn)?;
        Ok(Self {
            device: Some(device),
        })
    }

    /// The next streamed reading: two bytes straight off the wire.
    ///
    /// Blocks up to the read timeout per byte. With the feed ticking
    /// once a second, a timeout shorter than that will miss beats;
    /// a timed-out call is safe to retry.
    pub fn sample(&mut self) -> Result<u16> {
        let Some(device) = self.device.as_mut() else {
            return Err(Error::Transport(gqrust_transport::Error::NotConnected));
        };
        device.stream_sample()
    }

    /// Switch the feed off and return the device.
    ///
    /// Samples still in flight when the stop command goes out are
    /// drained before the device is handed back, so the next command
    /// sees a quiet wire.
    pub fn stop(mut self) -> Result<Device> {
        let Some(mut device) = self.device.take() else {
            return Err(Error::Transport(gqrust_transport::Error::NotConnected));
        };
        info!("stopping CPS stream");
        device.exchange(&Command::HeartbeatOff)?;
        device.drain_inbound()?;
        Ok(device)
    }
}

impl Drop for CpsStream {
    fn drop(&mut self) {
        if let Some(mut device) = self.device.take() {
            warn!("CPS stream dropped while running; stopping feed");
            if let Err(err) = device.exchange(&Command::HeartbeatOff) {
                warn!("failed to stop CPS feed: {err}");
            }
        }
    }
}
