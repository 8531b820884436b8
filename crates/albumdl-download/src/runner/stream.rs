//! Lossy line reading for child process pipes.
//!
//! Downloaders (and the ffmpeg they drive) can emit non-UTF8 bytes.
//! `BufReader::lines()` errors out on invalid UTF-8, so lines are read as
//! bytes and decoded lossily instead.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub struct LossyLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LossyLines<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    /// Next line without its trailing `\n` / `\r\n`, or `None` at EOF.
    ///
    /// Cancel safe: bytes of a partially read line stay buffered and are
    /// returned by the next call.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }

        let mut bytes = std::mem::take(&mut self.buf);
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }

        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
