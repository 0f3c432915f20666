//! Immutable prefix-code trees.
//!
//! A tree maps symbols to bit strings: starting at the root, a 0 bit goes to
//! the left child and a 1 bit to the right child, and the leaf reached holds
//! the symbol. For example the codes `0 = A, 10 = B, 110 = C, 111 = D` form
//!
//! ```text
//!   .
//!  / \
//! A   .
//!    / \
//!   B   .
//!      / \
//!     C   D
//! ```
//!
//! Nodes live in a flat arena and refer to their children by index. The root
//! is always an internal node, no symbol appears in more than one leaf, and
//! not every symbol below the limit needs a leaf.
use crate::{CodecError, CodecResult};

/// A node in the code tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Terminal node carrying a symbol.
    Leaf { symbol: u32 },
    /// Branch; `left` is taken on a 0 bit, `right` on a 1 bit.
    Internal { left: usize, right: usize },
}

/// A code tree together with the code of every symbol it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: usize,
    /// Per-symbol code, indexed by symbol; `None` for symbols without a leaf.
    codes: Vec<Option<Vec<u8>>>,
    leaf_count: u32,
}

impl CodeTree {
    /// Build a tree from an arena of nodes rooted at `nodes[root]`.
    ///
    /// Fails if the root is a leaf, a child index is out of range or
    /// reachable twice, a leaf symbol is `>= symbol_limit`, or a symbol has
    /// more than one leaf.
    pub fn new(nodes: Vec<Node>, root: usize, symbol_limit: u32) -> CodecResult<Self> {
        if symbol_limit < 2 {
            return Err(CodecError::TooFewSymbols);
        }
        match nodes.get(root) {
            Some(Node::Internal { .. }) => {}
            _ => return Err(CodecError::InvalidTree),
        }

        let mut codes = vec![None; symbol_limit as usize];
        let mut visited = vec![false; nodes.len()];
        let mut leaf_count = 0u32;
        let mut prefix = Vec::new();
        Self::collect_codes(
            &nodes,
            root,
            &mut prefix,
            &mut visited,
            &mut codes,
            &mut leaf_count,
        )?;

        Ok(CodeTree {
            nodes,
            root,
            codes,
            leaf_count,
        })
    }

    /// Walk the tree, recording the path to every leaf.
    fn collect_codes(
        nodes: &[Node],
        idx: usize,
        prefix: &mut Vec<u8>,
        visited: &mut [bool],
        codes: &mut [Option<Vec<u8>>],
        leaf_count: &mut u32,
    ) -> CodecResult<()> {
        match visited.get_mut(idx) {
            Some(seen) if !*seen => *seen = true,
            _ => return Err(CodecError::InvalidTree),
        }

        match nodes[idx] {
            Node::Internal { left, right } => {
                prefix.push(0);
                Self::collect_codes(nodes, left, prefix, visited, codes, leaf_count)?;
                prefix.pop();
                prefix.push(1);
                Self::collect_codes(nodes, right, prefix, visited, codes, leaf_count)?;
                prefix.pop();
            }
            Node::Leaf { symbol } => {
                let limit = codes.len() as u32;
                let slot = codes
                    .get_mut(symbol as usize)
                    .ok_or(CodecError::SymbolOutOfRange { symbol, limit })?;
                if slot.is_some() {
                    return Err(CodecError::DuplicateSymbol(symbol));
                }
                *slot = Some(prefix.clone());
                *leaf_count += 1;
            }
        }
        Ok(())
    }

    /// Index of the root node.
    pub fn root(&self) -> usize {
        self.root
    }

    /// The node stored at `idx`.
    ///
    /// Indices obtained from this tree's `root()` and `Internal` children are
    /// always valid.
    pub fn node(&self, idx: usize) -> Node {
        self.nodes[idx]
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    /// Exclusive upper bound on the symbols this tree may contain.
    pub fn symbol_limit(&self) -> u32 {
        self.codes.len() as u32
    }

    /// The code of `symbol` as a sequence of 0/1 bits, root first.
    pub fn get_code(&self, symbol: u32) -> CodecResult<&[u8]> {
        match self.codes.get(symbol as usize) {
            Some(Some(code)) => Ok(code),
            Some(None) => Err(CodecError::MissingCode(symbol)),
            None => Err(CodecError::SymbolOutOfRange {
                symbol,
                limit: self.symbol_limit(),
            }),
        }
    }
}

/// Lists every leaf in tree order, one `Code <bits>: Symbol <n>` line each.
impl std::fmt::Display for CodeTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack = vec![(self.root, String::new())];
        while let Some((idx, prefix)) = stack.pop() {
            match self.nodes[idx] {
                Node::Internal { left, right } => {
                    // Right first so the left subtree is printed first.
                    stack.push((right, format!("{prefix}1")));
                    stack.push((left, format!("{prefix}0")));
                }
                Node::Leaf { symbol } => writeln!(f, "Code {prefix}: Symbol {symbol}")?,
            }
        }
        Ok(())
    }
}
