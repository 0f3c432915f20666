//! A min-heap priority queue.
//!
//! Binary heap with an explicit ordered key per entry. Huffman construction
//! keys entries by [`HuffmanKey`], whose ordering makes tree building fully
//! deterministic.

/// Ordering key for partial Huffman trees.
///
/// Compares by `frequency` first, then by `lowest_symbol`. Since the partial
/// trees in a queue hold disjoint symbol sets, no two keys compare equal, so
/// the pop order never depends on heap layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HuffmanKey {
    /// Sum of the counts of all leaves in the tree.
    pub frequency: u64,
    /// Smallest symbol contained in the tree.
    pub lowest_symbol: u32,
}

/// An entry in the priority queue.
#[derive(Debug, Clone)]
struct HeapEntry<K, T> {
    key: K,
    data: T,
}

/// A min-heap priority queue that pops the entry with the smallest key first.
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
#[derive(Debug, Clone)]
pub struct MinHeap<K, T> {
    nodes: Vec<HeapEntry<K, T>>,
}

impl<K: Ord, T> MinHeap<K, T> {
    /// Create a new, empty min-heap.
    pub fn new() -> Self {
        MinHeap { nodes: Vec::new() }
    }

    /// Create an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push an element onto the heap with the given key.
    pub fn push(&mut self, key: K, data: T) {
        self.nodes.push(HeapEntry { key, data });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Pop the entry with the smallest key.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<(K, T)> {
        if self.nodes.is_empty() {
            return None;
        }
        // Swap root with last, remove last, sift down root
        let last = self.nodes.len() - 1;
        self.nodes.swap(0, last);
        let result = self.nodes.pop()?;
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some((result.key, result.data))
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].key < self.nodes[parent].key {
                self.nodes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.nodes[left].key < self.nodes[smallest].key {
                smallest = left;
            }
            if right < len && self.nodes[right].key < self.nodes[smallest].key {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<K: Ord, T> Default for MinHeap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
