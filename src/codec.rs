//! Byte-array Reed-Solomon facade.
//!
//! [`ReedSolomonCodec`] fixes the field to the QR-code GF(256) field and
//! bounds every block (data plus parity) to [`MAX_BLOCK_LEN`] bytes. The
//! chunked variants lift that bound by splitting data across consecutive
//! blocks of [`CHUNK_BLOCK_LEN`] bytes.
use crate::gf::GenericGf;
use crate::reedsolomon::{ReedSolomonDecoder, ReedSolomonEncoder};
use crate::{CodecError, CodecResult, MAX_BLOCK_LEN};

/// Block length used by the chunked codec.
///
/// Error locators are powers of the generator, which repeat after 255, so
/// byte 0 of a 256-byte block shares its locator with byte 255. Blocks of 255
/// bytes keep every position distinguishable.
pub const CHUNK_BLOCK_LEN: usize = MAX_BLOCK_LEN - 1;

/// Reed-Solomon over GF(256) with primitive `0x011D`.
///
/// Holds the encoder's generator cache, so reusing one codec across calls
/// avoids rebuilding generator polynomials.
#[derive(Debug, Clone)]
pub struct ReedSolomonCodec {
    encoder: ReedSolomonEncoder<'static>,
    decoder: ReedSolomonDecoder<'static>,
}

impl ReedSolomonCodec {
    pub fn new() -> Self {
        Self {
            encoder: ReedSolomonEncoder::qr_code(),
            decoder: ReedSolomonDecoder::new(GenericGf::qr_code_field_256()),
        }
    }

    /// Append `ec_bytes` of parity to `data`.
    ///
    /// Empty input is returned unchanged. Fails with `DataTooLarge` if the
    /// block would exceed [`MAX_BLOCK_LEN`] bytes.
    pub fn encode(&mut self, data: &[u8], ec_bytes: usize) -> CodecResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let total = data.len() + ec_bytes;
        if total > MAX_BLOCK_LEN {
            return Err(CodecError::DataTooLarge {
                len: total,
                limit: MAX_BLOCK_LEN,
            });
        }
        let mut block = Vec::with_capacity(total);
        block.extend_from_slice(data);
        block.resize(total, 0);
        self.encoder.encode(&mut block, ec_bytes)?;
        Ok(block)
    }

    /// Repair a block produced by [`encode`](Self::encode) and strip its
    /// trailing `ec_bytes` of parity.
    pub fn decode(&self, data: &[u8], ec_bytes: usize) -> CodecResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        if data.len() > MAX_BLOCK_LEN {
            return Err(CodecError::DataTooLarge {
                len: data.len(),
                limit: MAX_BLOCK_LEN,
            });
        }
        if ec_bytes > data.len() {
            return Err(CodecError::InvalidBlock);
        }
        let mut block = data.to_vec();
        self.decoder.decode(&mut block, ec_bytes)?;
        block.truncate(data.len() - ec_bytes);
        Ok(block)
    }

    /// Protect data of any length: split it into pieces of
    /// `CHUNK_BLOCK_LEN - ec_bytes` bytes and encode each into its own block.
    ///
    /// Every block but the last is exactly [`CHUNK_BLOCK_LEN`] bytes. Fails
    /// unless `ec_bytes` is in `1..CHUNK_BLOCK_LEN`.
    pub fn encode_chunked(&mut self, data: &[u8], ec_bytes: usize) -> CodecResult<Vec<u8>> {
        let piece_len = Self::piece_len(ec_bytes)?;
        let blocks = data.len().div_ceil(piece_len);
        let mut out = Vec::with_capacity(data.len() + blocks * ec_bytes);
        for piece in data.chunks(piece_len) {
            out.extend_from_slice(&self.encode(piece, ec_bytes)?);
        }
        Ok(out)
    }

    /// Reverse [`encode_chunked`](Self::encode_chunked): split into
    /// [`CHUNK_BLOCK_LEN`]-byte blocks, repair and strip each, and concatenate.
    ///
    /// Fails on the first block that cannot be repaired.
    pub fn decode_chunked(&self, data: &[u8], ec_bytes: usize) -> CodecResult<Vec<u8>> {
        let piece_len = Self::piece_len(ec_bytes)?;
        let blocks = data.len().div_ceil(CHUNK_BLOCK_LEN);
        let mut out = Vec::with_capacity(blocks * piece_len);
        for (index, block) in data.chunks(CHUNK_BLOCK_LEN).enumerate() {
            match self.decode(block, ec_bytes) {
                Ok(piece) => out.extend_from_slice(&piece),
                Err(e) => {
                    log::warn!("block {} of {}: {}", index, blocks, e);
                    return Err(e);
                }
            }
        }
        Ok(out)
    }

    fn piece_len(ec_bytes: usize) -> CodecResult<usize> {
        if ec_bytes == 0 || ec_bytes >= CHUNK_BLOCK_LEN {
            return Err(CodecError::InvalidBlock);
        }
        Ok(CHUNK_BLOCK_LEN - ec_bytes)
    }
}

impl Default for ReedSolomonCodec {
    fn default() -> Self {
        Self::new()
    }
}
