//! Byte transport to the device UART.
//!
//! The physical serial link is reached through a UART↔TCP bridge (an
//! `esp_rfc2217_server`-style forwarder, or a simulator exposing device
//! UARTs as TCP ports). [`Transport`] is the seam the session and reader
//! depend on: a blocking timed read plus a write, nothing more, so a
//! direct serial implementation can be slotted in later without touching
//! either of them.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Read timeout applied to the underlying stream. Bounds how long the
/// reader task can block once the session is being shut down.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// A bidirectional byte stream to the device.
pub trait Transport: Send {
    /// Read available bytes, blocking up to the transport's read timeout.
    /// Returns `Ok(0)` when the timeout expires with no data.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data` to the device.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Clone a second handle to the same link, so the reader task can
    /// receive while the session keeps sending.
    fn try_clone(&self) -> io::Result<Box<dyn Transport>>;
}

/// TCP connection to a UART bridge.
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to the bridge at `addr` (host:port).
    pub fn connect(addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(TcpTransport { stream })
    }
}

impl Transport for TcpTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.stream.read(buf) {
            Ok(n) => Ok(n),
            // Timeout surfaces as WouldBlock on Unix and TimedOut on Windows.
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data)?;
        self.stream.flush()
    }

    fn try_clone(&self) -> io::Result<Box<dyn Transport>> {
        let stream = self.stream.try_clone()?;
        Ok(Box::new(TcpTransport { stream }))
    }
}
