//! Mock transport for testing the driver without hardware.
//!
//! [`MockTransport`] implements [`Transport`] over a script of
//! request/response pairs. Frames written by the driver are matched
//! against the script in order, and each match arms the paired
//! response for the following reads. Bytes queued with
//! [`MockTransport::push_unsolicited`] are served ahead of any
//! response, standing in for stale bytes in the OS buffer or for the
//! once-a-second heartbeat feed.
//!
//! # Example
//!
//! ```
//! use gqrust_transport::MockTransport;
//!
//! let mut mock = MockTransport::new();
//! // When the driver sends this frame, answer with these bytes.
//! mock.expect(b"<GETVER>>", b"GMC-300Re 4.20");
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::{error::*, Transport};

/// A scripted request/response pair.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact frame we expect to be sent.
    request: Vec<u8>,
    /// The bytes to serve back once the frame arrives.
    response: Vec<u8>,
}

/// A scripted [`Transport`] for tests.
#[derive(Debug)]
pub struct MockTransport {
    /// Ordered script of expected exchanges.
    expectations: VecDeque<Expectation>,
    /// Response armed by the last matched frame.
    pending_response: Option<Vec<u8>>,
    /// How much of the pending response has been read.
    response_cursor: usize,
    /// Bytes served before any scripted response.
    unsolicited: VecDeque<u8>,
    /// Whether the transport reports itself usable.
    connected: bool,
    /// Every frame written, in order.
    sent_log: Vec<Vec<u8>>,
}

impl MockTransport {
    /// Create a mock in the connected state with an empty script.
    pub fn new() -> Self {
        MockTransport {
            expectations: VecDeque::new(),
            pending_response: None,
            response_cursor: 0,
            unsolicited: VecDeque::new(),
            connected: true,
            sent_log: Vec::new(),
        }
    }

    /// Append an expected frame and the bytes it is answered with.
    /// Commands the device does not answer take an empty response.
    pub fn expect(&mut self, request: &[u8], response: &[u8]) {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
        });
    }

    /// Queue bytes that arrive without any frame being sent.
    pub fn push_unsolicited(&mut self, data: &[u8]) {
        self.unsolicited.extend(data);
    }

    /// Every frame written so far, one entry per `write_all`.
    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Scripted exchanges not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    /// Flip the connected state. When false, reads and writes fail
    /// with [`Error::NotConnected`].
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.sent_log.push(data.to_vec());

        let Some(expectation) = self.expectations.pop_front() else {
            return Err(Error::Script(format!(
                "no expectation left for frame {:02X?}",
                data
            )));
        };
        if data != expectation.request.as_slice() {
            return Err(Error::Script(format!(
                "unexpected frame: expected {:02X?}, got {:02X?}",
                expectation.request, data
            )));
        }
        self.pending_response = Some(expectation.response);
        self.response_cursor = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        if !self.unsolicited.is_empty() {
            let n = self.unsolicited.len().min(buf.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.unsolicited.pop_front().unwrap_or_default();
            }
            return Ok(n);
        }

        if let Some(ref response) = self.pending_response {
            let remaining = &response[self.response_cursor..];
            if remaining.is_empty() {
                self.pending_response = None;
                self.response_cursor = 0;
                return Err(Error::Timeout);
            }
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.response_cursor += n;
            if self.response_cursor >= response.len() {
                self.pending_response = None;
                self.response_cursor = 0;
            }
            Ok(n)
        } else {
            Err(Error::Timeout)
        }
    }

    fn endpoint(&self) -> String {
        "mock".to_string()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Cloneable handle over a [`MockTransport`].
///
/// A driver usually takes ownership of its transport, which would put
/// the script and the sent-frame log out of a test's reach. Hand the
/// driver one clone and keep another for scripting and assertions.
#[derive(Debug, Clone, Default)]
pub struct SharedMock(Arc<Mutex<MockTransport>>);

impl SharedMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the underlying mock to script it or inspect it.
    pub fn lock(&self) -> MutexGuard<'_, MockTransport> {
        self.0.lock()
    }
}

impl Transport for SharedMock {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.0.lock().write_all(data)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        self.0.lock().read(buf, timeout)
    }

    fn endpoint(&self) -> String {
        self.0.lock().endpoint()
    }

    fn is_connected(&self) -> bool {
        self.0.lock().is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TICK: Duration = Duration::from_millis(10);

    #[test]
    fn test_exchange_round_trip() {
        let mut mock = MockTransport::new();
        mock.expect(b"<GETVER>>", b"GMC-300Re 4.20");

        mock.write_all(b"<GETVER>>").unwrap();
        let mut buf = [0u8; 14];
        mock.read_exact(&mut buf, TICK).unwrap();
        assert_eq!(&buf, b"GMC-300Re 4.20");
    }

    #[test]
    fn test_tracks_sent_frames() {
        let mut mock = MockTransport::new();
        mock.expect(b"<GETCPM>>", &[0x00, 0x1C]);
        mock.expect(b"<POWEROFF>>", &[]);

        mock.write_all(b"<GETCPM>>").unwrap();
        let mut buf = [0u8; 2];
        mock.read_exact(&mut buf, TICK).unwrap();
        mock.write_all(b"<POWEROFF>>").unwrap();

        assert_eq!(mock.sent_frames().len(), 2);
        assert_eq!(mock.sent_frames()[1], b"<POWEROFF>>");
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[test]
    fn test_wrong_frame_is_script_error() {
        let mut mock = MockTransport::new();
        mock.expect(b"<GETCPM>>", &[0x00, 0x1C]);

        let result = mock.write_all(b"<GETCPS>>");
        assert!(matches!(result, Err(Error::Script(_))));
    }

    #[test]
    fn test_exhausted_script_is_error() {
        let mut mock = MockTransport::new();
        let result = mock.write_all(b"<GETCPM>>");
        assert!(matches!(result, Err(Error::Script(_))));
    }

    #[test]
    fn test_empty_wire_times_out() {
        let mut mock = MockTransport::new();
        let mut buf = [0u8; 1];
        assert!(matches!(mock.read(&mut buf, TICK), Err(Error::Timeout)));
    }

    #[test]
    fn test_unsolicited_bytes_come_first() {
        let mut mock = MockTransport::new();
        mock.push_unsolicited(&[0xAB, 0xCD]);

        let mut buf = [0u8; 1];
        assert_eq!(mock.read(&mut buf, TICK).unwrap(), 1);
        assert_eq!(buf[0], 0xAB);
        assert_eq!(mock.read(&mut buf, TICK).unwrap(), 1);
        assert_eq!(buf[0], 0xCD);
        assert!(matches!(mock.read(&mut buf, TICK), Err(Error::Timeout)));
    }

    #[test]
    fn test_read_exact_reports_short_read() {
        let mut mock = MockTransport::new();
        mock.expect(b"<GETVER>>", b"GMC");

        mock.write_all(b"<GETVER>>").unwrap();
        let mut buf = [0u8; 14];
        assert!(matches!(
            mock.read_exact(&mut buf, TICK),
            Err(Error::ShortRead {
                expected: 14,
                got: 3
            })
        ));
    }

    #[test]
    fn test_shared_handle_sees_clone_traffic() {
        let shared = SharedMock::new();
        shared.lock().expect(b"<GETCPS>>", &[0x00, 0x02]);

        let mut driver_side = shared.clone();
        driver_side.write_all(b"<GETCPS>>").unwrap();
        let mut buf = [0u8; 2];
        driver_side.read_exact(&mut buf, TICK).unwrap();

        assert_eq!(shared.lock().sent_frames().len(), 1);
        assert_eq!(shared.lock().remaining_expectations(), 0);
    }

    #[test]
    fn test_disconnected_mock_refuses_io() {
        let mut mock = MockTransport::new();
        mock.set_connected(false);
        assert!(matches!(
            mock.write_all(b"<GETCPM>>"),
            Err(Error::NotConnected)
        ));
        let mut buf = [0u8; 1];
        assert!(matches!(mock.read(&mut buf, TICK), Err(Error::NotConnected)));
    }
}
