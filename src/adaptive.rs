//! Adaptive Huffman compression.
//!
//! Encoder and decoder start from the same uniform model and update it after
//! every symbol with the same rule, so no statistics are transmitted. The
//! compressed format is a bare bit stream with no header: each byte is coded
//! with the current tree, followed by one [`EOF_SYMBOL`] and zero padding to
//! the next byte boundary.
//!
//! **Model schedule** (after each byte, with `count` bytes processed so far):
//! - increment the byte's frequency;
//! - rebuild the tree if `count < period` and `count` is a power of two, or
//!   if `count` is a multiple of `period`;
//! - on a multiple of `period`, reset all frequencies to 1 right after the
//!   rebuild.
//!
//! With the default period of 262144 this matches existing streams bit for
//! bit. Other periods produce streams only readable with the same options.
use std::io::{ErrorKind, Read, Write};

use crate::bitio::{BitInputStream, BitOutputStream, StreamResult};
use crate::codetree::CodeTree;
use crate::frequency::FrequencyTable;
use crate::huffman::{HuffmanDecoder, HuffmanEncoder};
use crate::{CodecError, CodecResult, EOF_SYMBOL, RESET_PERIOD, SYMBOL_LIMIT};

/// Size of the read/write staging buffers.
const CHUNK_SIZE: usize = 64 * 1024;

/// Options shared by the adaptive compressor and decompressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveOptions {
    /// Number of symbols between frequency resets. Must be at least 1.
    pub reset_period: u64,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        AdaptiveOptions {
            reset_period: RESET_PERIOD,
        }
    }
}

/// The frequency model both sides evolve in lockstep.
#[derive(Debug, Clone)]
pub struct AdaptiveModel {
    table: FrequencyTable,
    count: u64,
    reset_period: u64,
}

impl AdaptiveModel {
    pub fn new(options: &AdaptiveOptions) -> CodecResult<Self> {
        if options.reset_period == 0 {
            return Err(CodecError::InvalidResetPeriod);
        }
        Ok(Self {
            table: FrequencyTable::uniform(SYMBOL_LIMIT)?,
            count: 0,
            reset_period: options.reset_period,
        })
    }

    /// Tree for the current frequencies.
    pub fn code_tree(&self) -> CodecResult<CodeTree> {
        self.table.build_code_tree()
    }

    /// Number of symbols processed since the start of the stream.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    /// Record one processed symbol.
    ///
    /// Returns the new tree when the schedule calls for a rebuild.
    pub fn update(&mut self, symbol: u32) -> CodecResult<Option<CodeTree>> {
        self.count += 1;
        self.table.increment(symbol)?;

        let period_end = self.count % self.reset_period == 0;
        let early = self.count < self.reset_period && self.count.is_power_of_two();
        if !(early || period_end) {
            return Ok(None);
        }

        let tree = self.table.build_code_tree()?;
        log::debug!("rebuilt code tree at symbol {}", self.count);
        if period_end {
            self.table = FrequencyTable::uniform(SYMBOL_LIMIT)?;
            log::debug!("reset frequency table at symbol {}", self.count);
        }
        Ok(Some(tree))
    }
}

/// Compress everything from `input` into `output`.
///
/// Returns the number of compressed bytes written.
pub fn compress<R: Read, W: Write>(
    mut input: R,
    output: W,
    options: &AdaptiveOptions,
) -> StreamResult<u64> {
    let mut model = AdaptiveModel::new(options)?;
    let mut encoder = HuffmanEncoder::new(BitOutputStream::new(output));
    encoder.set_code_tree(model.code_tree()?);

    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            let symbol = byte as u32;
            encoder.write(symbol)?;
            if let Some(tree) = model.update(symbol)? {
                encoder.set_code_tree(tree);
            }
        }
    }
    encoder.write(EOF_SYMBOL)?;

    let written = encoder.finished_len();
    encoder.finish()?;
    Ok(written)
}

/// Decompress a stream produced by [`compress`] with the same options.
///
/// Stops at the end-of-stream symbol; anything after it is left unread.
/// Returns the number of decompressed bytes written.
pub fn decompress<R: Read, W: Write>(
    input: R,
    mut output: W,
    options: &AdaptiveOptions,
) -> StreamResult<u64> {
    let mut model = AdaptiveModel::new(options)?;
    let mut decoder = HuffmanDecoder::new(BitInputStream::new(input));
    decoder.set_code_tree(model.code_tree()?);

    let mut pending: Vec<u8> = Vec::with_capacity(CHUNK_SIZE);
    let mut written = 0u64;
    loop {
        let symbol = decoder.read()?;
        if symbol == EOF_SYMBOL {
            break;
        }
        // Every other leaf of a 257-symbol tree is a byte value.
        pending.push(symbol as u8);
        if let Some(tree) = model.update(symbol)? {
            decoder.set_code_tree(tree);
        }
        if pending.len() == CHUNK_SIZE {
            output.write_all(&pending)?;
            written += pending.len() as u64;
            pending.clear();
        }
    }
    output.write_all(&pending)?;
    written += pending.len() as u64;
    output.flush()?;
    Ok(written)
}

/// Compress a byte slice with the default schedule.
pub fn encode(input: &[u8]) -> StreamResult<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() / 2 + 2);
    compress(input, &mut output, &AdaptiveOptions::default())?;
    Ok(output)
}

/// Decompress a byte slice produced by [`encode`].
pub fn decode(input: &[u8]) -> StreamResult<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    decompress(input, &mut output, &AdaptiveOptions::default())?;
    Ok(output)
}
