//! Buffered byte input with position tracking.
//!
//! Bytes are pulled from the underlying [`Read`] in blocks and consumed one at
//! a time by the lexer. Characters are only decoded where the lexer needs
//! them (error messages and Unicode whitespace); string payloads are copied
//! as raw bytes and validated once the closing quote is reached.
use std::io::{self, Read};

const BLOCK_SIZE: usize = 8 * 1024;

#[derive(Debug)]
pub(crate) struct Input<R> {
    reader: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    eof: bool,

    line: usize,
    column: usize,
}

impl<R: Read> Input<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; BLOCK_SIZE].into_boxed_slice(),
            start: 0,
            end: 0,
            eof: false,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn into_inner(self) -> R {
        self.reader
    }

    pub(crate) fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Makes at least `n` bytes available unless the reader is exhausted, and
    /// returns how many are buffered.
    fn ensure(&mut self, n: usize) -> io::Result<usize> {
        debug_assert!(n <= BLOCK_SIZE);
        if self.end - self.start >= n || self.eof {
            return Ok(self.end - self.start);
        }

        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }

        while self.end < n {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(read) => self.end += read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }

        Ok(self.end - self.start)
    }

    pub(crate) fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.ensure(1)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf[self.start]))
    }

    /// Decodes the character at the current position without consuming it.
    ///
    /// Invalid UTF-8 decodes as U+FFFD covering the bytes of the invalid
    /// prefix.
    pub(crate) fn peek_char(&mut self) -> io::Result<Option<(char, usize)>> {
        let available = self.ensure(4)?;
        if available == 0 {
            return Ok(None);
        }
        let (ch, len) = bstr::decode_utf8(&self.buf[self.start..self.end]);
        Ok(Some((ch.unwrap_or(char::REPLACEMENT_CHARACTER), len)))
    }

    /// Consumes one buffered byte. Must follow a successful `peek`.
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.start < self.end, "advance past buffered input");
        let byte = self.buf[self.start];
        self.start += 1;
        self.track(byte);
    }

    /// Consumes `n` buffered bytes.
    pub(crate) fn skip(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Copies bytes matching `pred` into `dst` until the first non-matching
    /// byte or the end of input. Returns the number of bytes copied.
    pub(crate) fn copy_while<F>(&mut self, dst: &mut Vec<u8>, pred: F) -> io::Result<usize>
    where
        F: Fn(u8) -> bool,
    {
        let mut copied = 0;
        loop {
            if self.ensure(1)? == 0 {
                return Ok(copied);
            }
            let chunk = &self.buf[self.start..self.end];
            let run = chunk.iter().position(|b| !pred(*b)).unwrap_or(chunk.len());
            dst.extend_from_slice(&chunk[..run]);
            for i in self.start..self.start + run {
                let byte = self.buf[i];
                self.track(byte);
            }
            self.start += run;
            copied += run;
            if self.start < self.end {
                return Ok(copied);
            }
        }
    }

    fn track(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            // continuation bytes belong to the character already counted
            self.column += 1;
        }
    }
}
