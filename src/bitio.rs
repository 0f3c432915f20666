//! Bit-level stream I/O over byte-oriented readers and writers.
//!
//! Both directions are MSB-first: the first bit written lands in the most
//! significant position of the first byte. Nothing is buffered beyond the
//! current partial byte, so wrap unbuffered sinks/sources in
//! `BufWriter`/`BufReader` when throughput matters.
use std::io::{self, ErrorKind, Read, Write};

use crate::CodecError;

/// Error type for bit stream operations.
///
/// Wraps codec errors, I/O errors from the underlying reader/writer, and a
/// premature end of input. Kept separate from `CodecError` so that
/// `CodecError` retains `Clone + PartialEq`.
#[derive(Debug)]
pub enum StreamError {
    /// Codec argument or model error.
    Codec(CodecError),
    /// I/O error from `Read` or `Write` operations.
    Io(io::Error),
    /// The input ended while a bit was still required.
    UnexpectedEof,
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::Codec(e) => write!(f, "{}", e),
            StreamError::Io(e) => write!(f, "I/O error: {}", e),
            StreamError::UnexpectedEof => write!(f, "unexpected end of stream"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Codec(e) => Some(e),
            StreamError::Io(e) => Some(e),
            StreamError::UnexpectedEof => None,
        }
    }
}

impl From<CodecError> for StreamError {
    fn from(e: CodecError) -> Self {
        StreamError::Codec(e)
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::Io(e)
    }
}

/// Result type for bit stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Writes single bits to a byte sink.
///
/// # Invariants
/// - `filled` is always < 8 between calls
/// - the low `filled` bits of `current` hold the pending bits in order
#[derive(Debug)]
pub struct BitOutputStream<W: Write> {
    output: W,
    current: u8,
    filled: u8,
    bytes_written: u64,
}

impl<W: Write> BitOutputStream<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            current: 0,
            filled: 0,
            bytes_written: 0,
        }
    }

    /// Write one bit, which must be 0 or 1.
    ///
    /// A completed byte is handed to the sink immediately.
    pub fn write_bit(&mut self, bit: u8) -> StreamResult<()> {
        if bit > 1 {
            return Err(CodecError::InvalidBit(bit).into());
        }
        self.current = (self.current << 1) | bit;
        self.filled += 1;
        if self.filled == 8 {
            self.output.write_all(&[self.current])?;
            self.bytes_written += 1;
            self.current = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Number of whole bytes handed to the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of bits waiting in the current partial byte (0-7).
    pub fn pending_bits(&self) -> u8 {
        self.filled
    }

    /// Pad the final partial byte with zero bits, flush, and return the sink.
    pub fn close(mut self) -> StreamResult<W> {
        while self.filled != 0 {
            self.write_bit(0)?;
        }
        self.output.flush()?;
        Ok(self.output)
    }
}

/// Reads single bits from a byte source.
#[derive(Debug)]
pub struct BitInputStream<R: Read> {
    input: R,
    current: u8,
    remaining: u8,
    at_eof: bool,
}

impl<R: Read> BitInputStream<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            current: 0,
            remaining: 0,
            at_eof: false,
        }
    }

    /// Read one bit, or `None` once the source is exhausted.
    ///
    /// After the first `None` every later call also returns `None`.
    pub fn read_bit(&mut self) -> StreamResult<Option<u8>> {
        if self.at_eof {
            return Ok(None);
        }
        if self.remaining == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.remaining = 8;
                }
                None => {
                    self.at_eof = true;
                    return Ok(None);
                }
            }
        }
        self.remaining -= 1;
        Ok(Some((self.current >> self.remaining) & 1))
    }

    /// Read one bit, failing with `UnexpectedEof` if the source is exhausted.
    pub fn read_bit_required(&mut self) -> StreamResult<u8> {
        self.read_bit()?.ok_or(StreamError::UnexpectedEof)
    }

    /// Release the source. Any unread bits of the current byte are dropped.
    pub fn close(self) -> R {
        self.input
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
