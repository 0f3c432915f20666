//! Reed-Solomon forward error correction over GF(256).
//!
//! [`ReedSolomonEncoder`] appends parity to a block in place (systematic
//! encoding); [`ReedSolomonDecoder`] repairs up to half as many corrupted
//! bytes as there are parity bytes, also in place. The block-oriented
//! byte API lives in [`crate::codec`].
mod decoder;
mod encoder;

pub use decoder::ReedSolomonDecoder;
pub use encoder::ReedSolomonEncoder;
