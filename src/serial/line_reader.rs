//! # Telemetry Line Reader
//!
//! Splits an async byte stream into newline-terminated telemetry lines.
//!
//! Works over any [`AsyncRead`], so tests can drive it from in-memory
//! buffers instead of real hardware. Non-UTF-8 bytes (radio noise on the
//! serial line) are dropped rather than failing the read.

use crate::error::Result;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Initial capacity of the accumulation buffer
const READ_BUFFER_CAPACITY: usize = 1024;

/// Buffered reader producing one trimmed telemetry line at a time.
pub struct LineReader<R> {
    reader: R,
    buffer: BytesMut,
    eof: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// Wrap a byte source
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
            eof: false,
        }
    }

    /// Read the next line from the stream
    ///
    /// Blocks (asynchronously) until a full line is available. Invalid
    /// UTF-8 byte sequences are dropped from the decoded line; leading and
    /// trailing whitespace (including the CR of a CRLF terminator) is
    /// trimmed.
    ///
    /// # Returns
    ///
    /// * `Result<Option<String>>` - The next line, or `None` at end of
    ///   stream (a trailing unterminated line is returned first)
    ///
    /// # Errors
    ///
    /// Returns error if the underlying read fails.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let raw = self.buffer.split_to(pos + 1);
                return Ok(Some(decode_lossy(&raw)));
            }

            if self.eof {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let raw = self.buffer.split();
                return Ok(Some(decode_lossy(&raw)));
            }

            let n = self.reader.read_buf(&mut self.buffer).await?;
            if n == 0 {
                self.eof = true;
            }
        }
    }
}

/// Decode raw line bytes, dropping invalid sequences and trimming whitespace
fn decode_lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect::<String>()
        .trim()
        .to_string()
}
