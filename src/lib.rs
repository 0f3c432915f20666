//! Adaptive Huffman compression and Reed-Solomon error correction.
//!
//! Two independent byte codecs:
//!
//! - an adaptive Huffman coder ([`adaptive`]) that compresses a byte stream
//!   without a statistics pass, rebuilding its code tree on a fixed schedule
//!   shared by encoder and decoder;
//! - a systematic Reed-Solomon code over GF(256) ([`reedsolomon`], with the
//!   block-level facade in [`codec`]) that repairs corrupted bytes.
//!
//! They compose freely: compress first, then protect the compressed bytes.

pub mod adaptive;
pub mod bitio;
pub mod codec;
pub mod codetree;
pub mod frequency;
pub mod gf;
pub mod gfpoly;
pub mod huffman;
pub mod pqueue;
pub mod reedsolomon;

#[cfg(test)]
mod validation;

/// Number of symbols in the byte-stream alphabet: 256 byte values plus EOF.
pub const SYMBOL_LIMIT: u32 = 257;

/// Reserved end-of-stream symbol, written once after the last byte.
pub const EOF_SYMBOL: u32 = SYMBOL_LIMIT - 1;

/// Number of symbols after which the adaptive model forgets its statistics.
pub const RESET_PERIOD: u64 = 262_144;

/// Primitive polynomial of the QR-code GF(256) field, x^8+x^4+x^3+x^2+1.
pub const QR_CODE_PRIMITIVE: u32 = 0x011D;

/// Primitive polynomial of the data-matrix GF(256) field, x^8+x^5+x^3+x^2+1.
pub const DATA_MATRIX_PRIMITIVE: u32 = 0x012D;

/// Largest block (data + parity) the Reed-Solomon facade accepts.
pub const MAX_BLOCK_LEN: usize = 256;

/// Reason a Reed-Solomon block could not be repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsFailure {
    /// The Euclidean algorithm hit a zero remainder before reaching the
    /// degree bound.
    RemainderZero,
    /// The error locator's constant term vanished.
    SigmaTildeZero,
    /// The error locator has fewer roots than its degree.
    LocatorDegreeMismatch,
    /// A computed error position lies outside the block.
    BadErrorLocation,
}

impl std::fmt::Display for RsFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemainderZero => write!(f, "r_{{i-1}} was zero"),
            Self::SigmaTildeZero => write!(f, "sigma tilde(0) was zero"),
            Self::LocatorDegreeMismatch => {
                write!(f, "error locator degree does not match number of roots")
            }
            Self::BadErrorLocation => write!(f, "bad error location"),
        }
    }
}

/// Error types for codec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Symbol is not in `[0, limit)`.
    SymbolOutOfRange { symbol: u32, limit: u32 },
    /// A bit other than 0 or 1 was written.
    InvalidBit(u8),
    /// A frequency table needs at least two symbols.
    TooFewSymbols,
    /// The current code tree has no leaf for this symbol.
    MissingCode(u32),
    /// No code tree has been installed yet.
    NoCodeTree,
    /// A code tree's root is a leaf, or a child index is dangling or shared.
    InvalidTree,
    /// Two leaves of a code tree carry the same symbol.
    DuplicateSymbol(u32),
    /// The symbol's count is already at the maximum.
    FrequencyOverflow(u32),
    /// Reset period of zero.
    InvalidResetPeriod,
    /// Polynomials belong to different fields.
    FieldMismatch,
    /// A polynomial needs at least one coefficient.
    EmptyPolynomial,
    /// Polynomial division by the zero polynomial.
    DivideByZero,
    /// Logarithm or inverse of the zero element.
    LogOfZero,
    /// Field size is not a power of two in `2..=256`, the primitive
    /// polynomial has the wrong degree, or an element is outside the field.
    InvalidField,
    /// The encoder only works over the QR-code GF(256) field.
    UnsupportedField,
    /// Block/parity lengths are inconsistent.
    InvalidBlock,
    /// Data does not fit in one Reed-Solomon block.
    DataTooLarge { len: usize, limit: usize },
    /// The block has more errors than the code can repair.
    Uncorrectable(RsFailure),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SymbolOutOfRange { symbol, limit } => {
                write!(f, "symbol {symbol} out of range (limit {limit})")
            }
            Self::InvalidBit(bit) => write!(f, "argument must be 0 or 1, got {bit}"),
            Self::TooFewSymbols => write!(f, "at least 2 symbols needed"),
            Self::MissingCode(symbol) => write!(f, "no code for symbol {symbol}"),
            Self::NoCodeTree => write!(f, "code tree is not set"),
            Self::InvalidTree => write!(f, "malformed code tree"),
            Self::DuplicateSymbol(symbol) => {
                write!(f, "symbol {symbol} has more than one code")
            }
            Self::FrequencyOverflow(symbol) => {
                write!(f, "maximum frequency reached for symbol {symbol}")
            }
            Self::InvalidResetPeriod => write!(f, "reset period must be at least 1"),
            Self::FieldMismatch => write!(f, "polynomials do not share the same field"),
            Self::EmptyPolynomial => write!(f, "polynomial has no coefficients"),
            Self::DivideByZero => write!(f, "divide by zero polynomial"),
            Self::LogOfZero => write!(f, "zero has no logarithm or inverse"),
            Self::InvalidField => write!(f, "invalid field parameters or element"),
            Self::UnsupportedField => write!(f, "only the QR-code GF(256) field is supported"),
            Self::InvalidBlock => write!(f, "invalid block or parity length"),
            Self::DataTooLarge { len, limit } => {
                write!(f, "block of {len} bytes exceeds {limit} bytes")
            }
            Self::Uncorrectable(reason) => write!(f, "uncorrectable block: {reason}"),
        }
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = Result<T, CodecError>;
