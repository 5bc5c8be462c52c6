//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary chunks; complete events are emitted once their
//! terminating blank line has been seen. Only the `data` field matters to the
//! dashboard, so `event`, `id`, `retry` and comment lines are dropped.
//!
//! Lines end in `\r\n`, `\n` or a lone `\r`, and a leading UTF-8 byte order
//! mark is skipped.

use thiserror::Error;

/// Longest line the decoder will buffer before giving up on the stream
pub const MAX_LINE_LEN: usize = 1024 * 1024;

const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseError {
    #[error("line longer than {limit} bytes")]
    LineTooLong { limit: usize },
}

#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
    max_line: usize,
    bom_checked: bool,
    // The previous chunk ended in `\r`; a `\n` opening the next one belongs to it
    skip_lf: bool,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_LEN)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            data: Vec::new(),
            max_line,
            bom_checked: false,
            skip_lf: false,
        }
    }

    /// Feed a chunk and return the data payloads of every event it completed.
    ///
    /// Fails once an unterminated line grows past the decoder's limit.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, SseError> {
        self.buffer.extend_from_slice(chunk);

        if !self.bom_checked {
            // The mark may itself be split across chunks
            if self.buffer.len() < BOM.len() && BOM.starts_with(&self.buffer) {
                return Ok(Vec::new());
            }
            if self.buffer.starts_with(BOM) {
                self.buffer.drain(..BOM.len());
            }
            self.bom_checked = true;
        }

        let mut consumed = 0;
        if self.skip_lf {
            match self.buffer.first() {
                Some(&b'\n') => {
                    consumed = 1;
                    self.skip_lf = false;
                }
                Some(_) => self.skip_lf = false,
                None => {}
            }
        }

        let mut events = Vec::new();
        while let Some(offset) = self.buffer[consumed..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
        {
            let end = consumed + offset;
            let line = String::from_utf8_lossy(&self.buffer[consumed..end]).into_owned();
            consumed = end + 1;

            if self.buffer[end] == b'\r' {
                match self.buffer.get(consumed) {
                    Some(&b'\n') => consumed += 1,
                    Some(_) => {}
                    None => self.skip_lf = true,
                }
            }

            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        self.buffer.drain(..consumed);

        if self.buffer.len() > self.max_line {
            self.buffer.clear();
            return Err(SseError::LineTooLong {
                limit: self.max_line,
            });
        }

        Ok(events)
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let payload = self.data.join("\n");
            self.data.clear();
            return Some(payload);
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            self.data.push(value.to_string());
        }

        None
    }
}
