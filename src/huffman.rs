//! Huffman symbol encoder and decoder over bit streams.
//!
//! Both sides hold a replaceable [`CodeTree`]; swapping trees between symbols
//! is how the adaptive coder evolves its model.
use std::io::{Read, Write};

use crate::bitio::{BitInputStream, BitOutputStream, StreamResult};
use crate::codetree::{CodeTree, Node};
use crate::CodecError;

/// Writes symbols as their codes in the current tree.
#[derive(Debug)]
pub struct HuffmanEncoder<W: Write> {
    output: BitOutputStream<W>,
    code_tree: Option<CodeTree>,
}

impl<W: Write> HuffmanEncoder<W> {
    pub fn new(output: BitOutputStream<W>) -> Self {
        Self {
            output,
            code_tree: None,
        }
    }

    /// Replace the tree used for subsequent symbols.
    pub fn set_code_tree(&mut self, tree: CodeTree) {
        self.code_tree = Some(tree);
    }

    pub fn code_tree(&self) -> Option<&CodeTree> {
        self.code_tree.as_ref()
    }

    /// Write the code of `symbol`.
    ///
    /// Fails if no tree is set or the tree has no leaf for `symbol`.
    pub fn write(&mut self, symbol: u32) -> StreamResult<()> {
        let tree = self.code_tree.as_ref().ok_or(CodecError::NoCodeTree)?;
        for &bit in tree.get_code(symbol)? {
            self.output.write_bit(bit)?;
        }
        Ok(())
    }

    /// Length the output will have once finished, padding included.
    pub fn finished_len(&self) -> u64 {
        self.output.bytes_written() + (self.output.pending_bits() > 0) as u64
    }

    /// Pad and flush the bit stream, returning the underlying writer.
    pub fn finish(self) -> StreamResult<W> {
        self.output.close()
    }
}

/// Reads symbols by walking the current tree bit by bit.
#[derive(Debug)]
pub struct HuffmanDecoder<R: Read> {
    input: BitInputStream<R>,
    code_tree: Option<CodeTree>,
}

impl<R: Read> HuffmanDecoder<R> {
    pub fn new(input: BitInputStream<R>) -> Self {
        Self {
            input,
            code_tree: None,
        }
    }

    /// Replace the tree used for subsequent symbols.
    pub fn set_code_tree(&mut self, tree: CodeTree) {
        self.code_tree = Some(tree);
    }

    pub fn code_tree(&self) -> Option<&CodeTree> {
        self.code_tree.as_ref()
    }

    /// Read one symbol.
    ///
    /// Fails if no tree is set or the input ends in the middle of a code.
    pub fn read(&mut self) -> StreamResult<u32> {
        let tree = self.code_tree.as_ref().ok_or(CodecError::NoCodeTree)?;
        let mut idx = tree.root();
        loop {
            let Node::Internal { left, right } = tree.node(idx) else {
                // The root is internal and leaves end the walk below.
                return Err(CodecError::InvalidTree.into());
            };
            let next = if self.input.read_bit_required()? == 0 {
                left
            } else {
                right
            };
            match tree.node(next) {
                Node::Leaf { symbol } => return Ok(symbol),
                Node::Internal { .. } => idx = next,
            }
        }
    }

    /// Release the underlying reader.
    pub fn into_inner(self) -> R {
        self.input.close()
    }
}
