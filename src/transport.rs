// Serial transport for the encoder line stream
//
// The encoder board emits newline-terminated text records. The runtime
// polls once per tick; a read timeout simply means the board had
// nothing new, which is routine and never an error.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use thiserror::Error;
use tracing::{info, warn};

const READ_TIMEOUT_MS: u64 = 5;
// An unterminated buffer longer than this is line noise, not a record
const MAX_PENDING_BYTES: usize = 1024;
// Zero-velocity command understood by the board firmware
const STOP_COMMAND: &[u8] = b"V:0,0\n";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct LineTransport {
    port: Box<dyn SerialPort>,
    pending: Vec<u8>,
}

impl LineTransport {
    pub fn open(port_name: &str, baudrate: u32) -> Result<Self, TransportError> {
        info!("Opening encoder link on {} at {} baud", port_name, baudrate);
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;

        Ok(Self {
            port,
            pending: Vec::new(),
        })
    }

    /// Drain everything the port has buffered and return the complete
    /// records, oldest first. Returns an empty vec when no full line
    /// has arrived yet.
    pub fn poll_lines(&mut self) -> Result<Vec<String>, TransportError> {
        let mut chunk = [0u8; 512];
        while self.port.bytes_to_read()? > 0 {
            match self.port.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }

        if self.pending.len() > MAX_PENDING_BYTES && !self.pending.contains(&b'\n') {
            warn!(
                "Dropping {} bytes of unterminated serial data",
                self.pending.len()
            );
            self.pending.clear();
        }

        Ok(split_lines(&mut self.pending))
    }

    /// Best-effort zero-velocity command for shutdown. The link may
    /// already be gone; that is logged, never propagated.
    pub fn send_stop(&mut self) {
        let result = self
            .port
            .write_all(STOP_COMMAND)
            .and_then(|()| self.port.flush());
        if let Err(e) = result {
            warn!("Failed to send stop command: {}", e);
        }
    }
}

/// Split complete newline-terminated records off the front of `buf`,
/// leaving any trailing partial line in place for the next poll.
fn split_lines(buf: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
        let raw: Vec<u8> = buf.drain(..=pos).collect();
        let line = String::from_utf8_lossy(&raw).trim().to_string();
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_complete_lines() {
        let mut buf = b"L: 1, R: 2\nL: 3, R: 4\n".to_vec();
        let lines = split_lines(&mut buf);
        assert_eq!(lines, vec!["L: 1, R: 2", "L: 3, R: 4"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_partial_line_stays_buffered() {
        let mut buf = b"L: 1, R: 2\nL: 3".to_vec();
        let lines = split_lines(&mut buf);
        assert_eq!(lines, vec!["L: 1, R: 2"]);
        assert_eq!(buf, b"L: 3");

        // The rest of the record arrives on a later poll
        buf.extend_from_slice(b", R: 4\n");
        assert_eq!(split_lines(&mut buf), vec!["L: 3, R: 4"]);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let mut buf = b"L: 1, R: 2\r\n\r\n\n".to_vec();
        let lines = split_lines(&mut buf);
        assert_eq!(lines, vec!["L: 1, R: 2"]);
    }

    #[test]
    fn test_no_newline_no_lines() {
        let mut buf = b"L: 1".to_vec();
        assert!(split_lines(&mut buf).is_empty());
        assert_eq!(buf, b"L: 1");
    }
}
