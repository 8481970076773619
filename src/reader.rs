//! Line reader for harness output.
//!
//! Tracks 1-based line numbers for error reporting and strips LF / CRLF
//! terminators. Bytes that are not valid UTF-8 are replaced rather than
//! rejected, since arbitrary tool chatter is interleaved with results.

use std::io::{self, BufRead, BufReader, Read};

pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: Vec::new(),
        }
    }

    /// Read the next line, `None` at end of stream.
    pub fn next_line(&mut self) -> io::Result<Option<(usize, String)>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buffer.ends_with(b"\n") {
            self.buffer.pop();
            if self.buffer.ends_with(b"\r") {
                self.buffer.pop();
            }
        }

        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        Ok(Some((self.line_number, line)))
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
