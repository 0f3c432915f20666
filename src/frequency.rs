//! Symbol frequency tables.
//!
//! A table holds one count per symbol in `[0, symbol_limit)` and builds the
//! Huffman code tree that is optimal for the current counts. Tree building is
//! deterministic: identical tables always yield identical trees, which is
//! what lets an adaptive encoder and decoder stay in lockstep.
use crate::codetree::{CodeTree, Node};
use crate::pqueue::{HuffmanKey, MinHeap};
use crate::{CodecError, CodecResult};

/// A table of per-symbol counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each symbol (index = symbol).
    counts: Vec<u32>,
}

impl FrequencyTable {
    /// Create a table from explicit counts. At least two symbols are needed.
    pub fn from_counts(counts: Vec<u32>) -> CodecResult<Self> {
        if counts.len() < 2 || counts.len() > u32::MAX as usize {
            return Err(CodecError::TooFewSymbols);
        }
        Ok(Self { counts })
    }

    /// Create a table where every symbol has count 1.
    pub fn uniform(symbol_limit: u32) -> CodecResult<Self> {
        Self::from_counts(vec![1; symbol_limit as usize])
    }

    /// Number of symbols in the table, always at least 2.
    pub fn symbol_limit(&self) -> u32 {
        self.counts.len() as u32
    }

    /// Get the count of `symbol`.
    pub fn get(&self, symbol: u32) -> CodecResult<u32> {
        let idx = self.check_symbol(symbol)?;
        Ok(self.counts[idx])
    }

    /// Set the count of `symbol`.
    pub fn set(&mut self, symbol: u32, count: u32) -> CodecResult<()> {
        let idx = self.check_symbol(symbol)?;
        self.counts[idx] = count;
        Ok(())
    }

    /// Add one to the count of `symbol`.
    ///
    /// Fails with `FrequencyOverflow` if the count is already `u32::MAX`.
    pub fn increment(&mut self, symbol: u32) -> CodecResult<()> {
        let idx = self.check_symbol(symbol)?;
        self.counts[idx] = self.counts[idx]
            .checked_add(1)
            .ok_or(CodecError::FrequencyOverflow(symbol))?;
        Ok(())
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f32;
        self.counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f32 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    fn check_symbol(&self, symbol: u32) -> CodecResult<usize> {
        if (symbol as usize) < self.counts.len() {
            Ok(symbol as usize)
        } else {
            Err(CodecError::SymbolOutOfRange {
                symbol,
                limit: self.symbol_limit(),
            })
        }
    }

    /// Build a code tree that is optimal for the current counts.
    ///
    /// Every symbol with a nonzero count gets a leaf. If fewer than two such
    /// symbols exist, zero-count symbols are added in ascending order until
    /// there are two, so the tree always has an internal root. Merging always
    /// takes the two smallest `(frequency, lowest_symbol)` keys.
    pub fn build_code_tree(&self) -> CodecResult<CodeTree> {
        let mut nodes: Vec<Node> = Vec::with_capacity(2 * self.counts.len());
        let mut heap: MinHeap<HuffmanKey, usize> = MinHeap::with_capacity(self.counts.len());

        let mut push_leaf = |nodes: &mut Vec<Node>, symbol: usize, frequency: u32| {
            let idx = nodes.len();
            nodes.push(Node::Leaf {
                symbol: symbol as u32,
            });
            heap.push(
                HuffmanKey {
                    frequency: frequency as u64,
                    lowest_symbol: symbol as u32,
                },
                idx,
            );
        };

        for (symbol, &count) in self.counts.iter().enumerate() {
            if count > 0 {
                push_leaf(&mut nodes, symbol, count);
            }
        }

        let mut padded = 0;
        for (symbol, &count) in self.counts.iter().enumerate() {
            if nodes.len() >= 2 {
                break;
            }
            if count == 0 {
                push_leaf(&mut nodes, symbol, 0);
                padded += 1;
            }
        }
        if padded > 0 {
            log::trace!("padded code tree with {} zero-count symbols", padded);
        }

        if heap.len() < 2 {
            return Err(CodecError::TooFewSymbols);
        }

        // Standard Huffman construction: merge the two smallest entries
        while heap.len() > 1 {
            let (Some((x_key, x_idx)), Some((y_key, y_idx))) = (heap.pop(), heap.pop()) else {
                return Err(CodecError::InvalidTree);
            };
            let idx = nodes.len();
            nodes.push(Node::Internal {
                left: x_idx,
                right: y_idx,
            });
            heap.push(
                HuffmanKey {
                    frequency: x_key.frequency + y_key.frequency,
                    lowest_symbol: x_key.lowest_symbol.min(y_key.lowest_symbol),
                },
                idx,
            );
        }

        let (_, root) = heap.pop().ok_or(CodecError::InvalidTree)?;
        CodeTree::new(nodes, root, self.symbol_limit())
    }
}
