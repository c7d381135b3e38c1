//! High-level device interface

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::{debug, info, trace, warn};

use gqrust_core::command::Command;
use gqrust_core::config::Config;
use gqrust_core::constants::{ACK, CONFIG_SIZE, FLUSH_LIMIT};
use gqrust_core::history::{self, HistoryRecord, HistorySpan};
use gqrust_core::{reply, Operation};
use gqrust_transport::{SerialConfig, SerialTransport, Transport};
use gqrust_types::{DeviceDateTime, DeviceInfo, SoftKey};

use crate::error::{Error, ErrorKind, Result};
use crate::stream::CpsStream;

/// GQ GMC geiger counter
///
/// High-level interface over one serial connection. Every operation
/// blocks until its exchange completes or times out; the device
/// answers one command at a time and the handle is meant for exactly
/// one caller.
///
/// # Examples
///
/// ```no_run
/// use gqrust::Device;
///
/// fn main() -> gqrust::Result<()> {
///     let mut device = Device::open("/dev/ttyUSB0")?;
///
///     println!("Device: {}", device.firmware());
///     println!("CPM: {}", device.cpm()?);
///
///     Ok(())
/// }
/// ```
pub struct Device {
    transport: Box<dyn Transport>,
    timeout: Duration,
    info: DeviceInfo,
    config: Config,
    config_valid: bool,
    last_error: Option<ErrorKind>,
}

impl Device {
    /// Open a device on a serial port with default line settings.
    ///
    /// # Errors
    ///
    /// Fails only when the port itself cannot be opened. A device
    /// that opens but does not answer the identification queries is
    /// still returned, with the placeholder identity installed and
    /// the failure latched in [`Device::last_error`].
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with(path, &SerialConfig::default())
    }

    /// Open a device with explicit line settings.
    pub fn open_with(path: &str, serial: &SerialConfig) -> Result<Self> {
        let transport = SerialTransport::open(path, serial)?;
        Ok(Self::hello(Box::new(transport), serial.read_timeout))
    }

    /// Drive an already-open transport. This is how the driver runs
    /// against [`gqrust_transport::MockTransport`] in tests.
    pub fn with_transport(transport: Box<dyn Transport>, timeout: Duration) -> Self {
        Self::hello(transport, timeout)
    }

    /// Identification sequence run on every fresh connection: query
    /// the version, then pull the configuration block. Neither
    /// failure is fatal; both latch.
    fn hello(transport: Box<dyn Transport>, timeout: Duration) -> Self {
        let mut device = Self {
            transport,
            timeout,
            info: DeviceInfo::invalid(),
            config: Config::default(),
            config_valid: false,
            last_error: None,
        };
        info!("connected to {}", device.transport.endpoint());
        match device.version() {
            Ok(info) => {
                if let Err(err) = device.read_config() {
                    warn!("initial configuration read failed: {err}");
                }
                if info.is_legacy() {
                    warn!(
                        version = info.version(),
                        "firmware predates the full command set"
                    );
                    // A read failure in the sequence outranks the
                    // firmware warning.
                    if device.last_error.is_none() {
                        device.last_error = Some(ErrorKind::LegacyFirmware);
                    }
                }
            }
            Err(err) => warn!("version query failed: {err}"),
        }
        device
    }

    /// Whether the underlying transport is usable.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    // === Identity ===

    /// The cached identity from the last version query. Holds the
    /// fourteen-character `invalidinvalid` placeholder when no query
    /// has succeeded.
    pub fn firmware(&self) -> &DeviceInfo {
        &self.info
    }

    /// Query model and firmware revision, refreshing the cache.
    pub fn version(&mut self) -> Result<DeviceInfo> {
        debug!("reading firmware version");
        let raw = match self.exchange(&Command::GetVersion) {
            Ok(raw) => raw,
            Err(err) => {
                self.info = DeviceInfo::invalid();
                return Err(err);
            }
        };
        let info = reply::decode_version(&raw).map_err(|e| self.fail(e))?;
        info!(version = info.version(), "device identified");
        self.info = info.clone();
        Ok(info)
    }

    /// Query the unit serial number, as the fourteen-digit hex string
    /// printed on the case.
    pub fn serial_number(&mut self) -> Result<String> {
        debug!("reading serial number");
        let raw = self.exchange(&Command::GetSerial)?;
        reply::decode_serial(&raw).map_err(|e| self.fail(e))
    }

    // === Readings ===

    /// Counts over the last rolling minute.
    pub fn cpm(&mut self) -> Result<u16> {
        debug!("reading CPM");
        let raw = self.exchange(&Command::GetCpm)?;
        reply::decode_rate(&raw).map_err(|e| self.fail(e))
    }

    /// Counts over the last second.
    pub fn cps(&mut self) -> Result<u16> {
        debug!("reading CPS");
        let raw = self.exchange(&Command::GetCps)?;
        reply::decode_rate(&raw).map_err(|e| self.fail(e))
    }

    /// Battery voltage in volts.
    pub fn battery_voltage(&mut self) -> Result<f32> {
        debug!("reading battery voltage");
        let raw = self.exchange(&Command::GetVoltage)?;
        reply::decode_voltage(&raw).map_err(|e| self.fail(e))
    }

    // === Configuration ===

    /// The configuration mirror as of the last successful read.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Edit the mirror. Nothing reaches the device until
    /// [`Device::commit_config`].
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Whether the mirror has been filled by a successful read.
    pub fn config_valid(&self) -> bool {
        self.config_valid
    }

    /// Refresh the mirror from the device. Front-panel changes are
    /// only picked up here. The mirror is replaced only by a
    /// complete 256-byte read.
    pub fn read_config(&mut self) -> Result<&Config> {
        debug!("reading configuration block");
        let raw = self.exchange(&Command::GetConfig)?;
        let mut block = [0u8; CONFIG_SIZE];
        block.copy_from_slice(&raw);
        self.config = Config::from_bytes(block);
        self.config_valid = true;
        Ok(&self.config)
    }

    /// Write the mirror back to the device.
    ///
    /// NVM is rewritten as a whole: factory erase, then 256
    /// single-byte writes each confirmed by an acknowledgement, then
    /// the update command that makes the device load the new block.
    /// A missing acknowledgement aborts the sequence and the update
    /// command is not sent. After the update, a read-back confirms
    /// the device holds exactly the mirror.
    ///
    /// Batch every field change before committing; interdependent
    /// fields committed halfway apply in inconsistent combinations.
    pub fn commit_config(&mut self) -> Result<()> {
        info!("committing configuration block");
        let block = *self.config.as_bytes();
        self.exchange(&Command::EraseConfig)?;
        for (offset, &value) in block.iter().enumerate() {
            self.exchange(&Command::WriteConfigByte {
                offset: offset as u8,
                value,
            })?;
        }
        self.exchange(&Command::UpdateConfig)?;
        self.verify_config()
    }

    fn verify_config(&mut self) -> Result<()> {
        debug!("verifying committed configuration");
        let raw = self.exchange(&Command::GetConfig)?;
        let mismatch = raw
            .iter()
            .zip(self.config.as_bytes().iter())
            .position(|(device, mirror)| device != mirror);
        if let Some(offset) = mismatch {
            return Err(self.fail(Error::ConfigVerify { offset }));
        }
        debug!("configuration verified");
        Ok(())
    }

    // === History ===

    /// Read a raw window of the history flash. The window is
    /// validated against the device limits before anything is sent.
    pub fn read_history(&mut self, address: u32, length: u16) -> Result<Vec<u8>> {
        let span = HistorySpan::new(address, length).map_err(|e| self.fail(e))?;
        debug!(address, length, "reading history");
        self.exchange(&Command::ReadHistory(span))
    }

    /// Read a window of the history flash and decode it into records.
    pub fn read_history_records(
        &mut self,
        address: u32,
        length: u16,
    ) -> Result<Vec<HistoryRecord>> {
        let raw = self.read_history(address, length)?;
        Ok(history::decode(&raw))
    }

    // === Clock ===

    /// Set the device date. Three sub-commands, one per field; each
    /// is acknowledged separately and there is no aggregate success
    /// signal beyond all three acknowledgements arriving.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<()> {
        let stamp = DeviceDateTime::from_naive(&date.and_time(NaiveTime::MIN))
            .map_err(|e| self.fail(e))?;
        debug!(%date, "setting device date");
        self.exchange(&Command::SetDateMonth(stamp.month))?;
        self.exchange(&Command::SetDateDay(stamp.day))?;
        self.exchange(&Command::SetDateYear(stamp.year))?;
        Ok(())
    }

    /// Set the device time of day. Three acknowledged sub-commands,
    /// like [`Device::set_date`].
    pub fn set_time(&mut self, time: NaiveTime) -> Result<()> {
        debug!(%time, "setting device time");
        self.exchange(&Command::SetTimeHour(time.hour() as u8))?;
        self.exchange(&Command::SetTimeMinute(time.minute() as u8))?;
        self.exchange(&Command::SetTimeSecond(time.second() as u8))?;
        Ok(())
    }

    /// Set date and time together.
    pub fn set_clock(&mut self, moment: NaiveDateTime) -> Result<()> {
        self.set_date(moment.date())?;
        self.set_time(moment.time())
    }

    // === Control ===

    /// Emulate a front-panel key press. The device sends nothing
    /// back.
    pub fn send_key(&mut self, key: SoftKey) -> Result<()> {
        debug!(?key, "pressing front-panel key");
        self.exchange(&Command::SendKey(key))?;
        Ok(())
    }

    /// Switch the unit off. There is no farewell from the device, so
    /// the handle is consumed.
    pub fn power_off(mut self) -> Result<()> {
        info!("powering off");
        self.exchange(&Command::PowerOff)?;
        Ok(())
    }

    // === Streaming ===

    /// Switch the once-a-second CPS feed on. The returned stream
    /// holds the device exclusively; [`CpsStream::stop`] hands it
    /// back.
    pub fn start_streaming(self) -> Result<CpsStream> {
        CpsStream::start(self)
    }

    // === Error latch ===

    /// Classification of the most recent failure. One active code at
    /// a time: the latch clears when the next command goes out, so
    /// after a successful operation it reads `None`.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Reset the failure latch without issuing a command.
    pub fn clear_last_error(&mut self) {
        self.last_error = None;
    }

    fn fail(&mut self, err: impl Into<Error>) -> Error {
        let err = err.into();
        self.last_error = Some(err.kind());
        err
    }

    // === Wire plumbing ===

    /// One command round-trip: drain stale bytes, send the frame,
    /// read the exact reply length. Every command starts with a
    /// clean error latch.
    pub(crate) fn exchange(&mut self, command: &Command) -> Result<Vec<u8>> {
        self.last_error = None;
        let operation = command.operation();
        self.flush_inbound(operation)?;
        let frame = command.encode();
        trace!(%command, "sending");
        self.transport
            .write_all(&frame)
            .map_err(|source| self.fail(Error::Command { operation, source }))?;
        let mut raw = vec![0u8; command.reply_len()];
        if !raw.is_empty() {
            self.transport
                .read_exact(&mut raw, self.timeout)
                .map_err(|source| self.fail(Error::Command { operation, source }))?;
        }
        if command.is_acked() && raw[0] != ACK {
            // Arrival of the byte is the acknowledgement; its value
            // is nominal.
            debug!(byte = raw[0], %command, "unusual acknowledgement byte");
        }
        Ok(raw)
    }

    /// Drain whatever sits in the inbound buffer before a command. A
    /// quiet wire times out on the first probe. Ten probes that all
    /// yield bytes abort the exchange before the frame is sent.
    fn flush_inbound(&mut self, operation: Operation) -> Result<()> {
        let mut scratch = [0u8; 1];
        for _ in 0..FLUSH_LIMIT {
            match self.transport.read(&mut scratch, self.timeout) {
                Ok(_) => trace!(byte = scratch[0], "discarded stale byte"),
                Err(gqrust_transport::Error::Timeout) => return Ok(()),
                Err(source) => {
                    return Err(self.fail(Error::Command { operation, source }));
                }
            }
        }
        Err(self.fail(Error::FlushFailed))
    }

    /// One streamed reading: two bytes straight off the wire, no
    /// flush and no command.
    pub(crate) fn stream_sample(&mut self) -> Result<u16> {
        let mut raw = [0u8; 2];
        self.transport.read_exact(&mut raw, self.timeout).map_err(|source| {
            self.fail(Error::Command {
                operation: Operation::AutoCps,
                source,
            })
        })?;
        reply::decode_rate(&raw).map_err(|e| self.fail(e))
    }

    /// Drain samples still in flight after the stream stops.
    pub(crate) fn drain_inbound(&mut self) -> Result<()> {
        self.flush_inbound(Operation::StreamStop)
    }
}
