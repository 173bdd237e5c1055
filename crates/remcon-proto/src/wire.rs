//! Bounded buffered reads over a client socket.
//!
//! The console protocol needs three read shapes: a full line, a raw chunk of
//! at most N bytes with a continuation flag (so the dispatcher can sniff the
//! first bytes of a line before committing to it), and a single byte. All
//! three stop at a newline, which stays in the returned bytes.

use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Initial capacity of the read buffer; matches the protocol's line cap.
const READ_BUF_CAPACITY: usize = 512;

/// Outcome of a bounded read.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// The peer closed the connection before a terminator was seen. Any
    /// partial bytes are discarded.
    Closed,
    /// Bytes consumed from the stream. `more` is true when the cap was hit
    /// before a newline, meaning the line continues and a follow-up read
    /// must fetch the remainder. When a newline was seen it is the last
    /// byte of `bytes` and `more` is false.
    Chunk { bytes: Vec<u8>, more: bool },
}

/// Buffered reader for the console wire protocol.
///
/// Reads are buffered internally but never consume past what the caller
/// asked for: a `read_chunk(6)` that stops mid-line leaves the rest of the
/// line in the buffer for the next call.
pub struct WireReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: AsyncRead + Unpin> WireReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_BUF_CAPACITY),
        }
    }

    /// Read at most `max_len` bytes, stopping early after a newline.
    ///
    /// Interrupted reads are retried inside the runtime and never surface;
    /// other transport errors are returned as-is.
    pub async fn read_chunk(&mut self, max_len: usize) -> io::Result<Frame> {
        loop {
            let window = self.buf.len().min(max_len);
            if let Some(pos) = self.buf[..window].iter().position(|b| *b == b'\n') {
                let bytes = self.buf.split_to(pos + 1).to_vec();
                return Ok(Frame::Chunk { bytes, more: false });
            }
            if self.buf.len() >= max_len {
                let bytes = self.buf.split_to(max_len).to_vec();
                return Ok(Frame::Chunk { bytes, more: true });
            }
            if self.inner.read_buf(&mut self.buf).await? == 0 {
                return Ok(Frame::Closed);
            }
        }
    }

    /// Read a line of at most `max_len - 1` bytes, newline included.
    ///
    /// `Frame::Chunk { more: true }` means the cap was reached with the line
    /// still unterminated; the unread tail stays in the stream.
    pub async fn read_line(&mut self, max_len: usize) -> io::Result<Frame> {
        self.read_chunk(max_len.saturating_sub(1)).await
    }

    /// Read exactly one byte, or `None` at end-of-stream.
    pub async fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            if !self.buf.is_empty() {
                return Ok(Some(self.buf.split_to(1)[0]));
            }
            if self.inner.read_buf(&mut self.buf).await? == 0 {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chunk_stops_after_newline() {
        let mut reader = WireReader::new(&b"abc\n"[..]);
        let frame = reader.read_chunk(10).await.unwrap();
        assert_eq!(
            frame,
            Frame::Chunk {
                bytes: b"abc\n".to_vec(),
                more: false
            }
        );
    }

    #[tokio::test]
    async fn chunk_stops_at_cap_and_flags_continuation() {
        let mut reader = WireReader::new(&b"abcdefghij"[..]);
        let frame = reader.read_chunk(10).await.unwrap();
        assert_eq!(
            frame,
            Frame::Chunk {
                bytes: b"abcdefghij".to_vec(),
                more: true
            }
        );
    }

    #[tokio::test]
    async fn chunk_leaves_unread_tail_buffered() {
        let mut reader = WireReader::new(&b"upload ok.bin data\n"[..]);
        let head = reader.read_chunk(6).await.unwrap();
        assert_eq!(
            head,
            Frame::Chunk {
                bytes: b"upload".to_vec(),
                more: true
            }
        );
        assert_eq!(reader.read_byte().await.unwrap(), Some(b' '));
        let rest = reader.read_chunk(512).await.unwrap();
        assert_eq!(
            rest,
            Frame::Chunk {
                bytes: b"ok.bin data\n".to_vec(),
                more: false
            }
        );
    }

    #[tokio::test]
    async fn close_before_terminator_discards_partial_bytes() {
        let mut reader = WireReader::new(&b"ab"[..]);
        assert_eq!(reader.read_chunk(10).await.unwrap(), Frame::Closed);
    }

    #[tokio::test]
    async fn read_line_caps_one_below_max() {
        let mut reader = WireReader::new(&b"abcdefghij"[..]);
        let frame = reader.read_line(6).await.unwrap();
        assert_eq!(
            frame,
            Frame::Chunk {
                bytes: b"abcde".to_vec(),
                more: true
            }
        );
    }

    #[tokio::test]
    async fn read_byte_then_eof() {
        let mut reader = WireReader::new(&b"x"[..]);
        assert_eq!(reader.read_byte().await.unwrap(), Some(b'x'));
        assert_eq!(reader.read_byte().await.unwrap(), None);
    }
}
