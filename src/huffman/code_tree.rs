use crate::frequency::FrequencyTable;
use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};

/// A node of a [`CodeTree`]. Internal nodes own both of their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        frequency: u64,
    },
    Internal {
        frequency: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf { frequency, .. } => *frequency,
            Node::Internal { frequency, .. } => *frequency,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn merge(left: Node, right: Node) -> Node {
        // saturating so hand-built tables with an overflowing total can't panic
        let frequency = left.frequency().saturating_add(right.frequency());
        Node::Internal {
            frequency,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A Huffman tree over byte symbols.
///
/// The tree has no root for an empty frequency table and is a single leaf if
/// only one symbol is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Option<Node>,
}

/// Entry of the priority queue used while building the tree.
///
/// Entries are ordered by `(frequency, sequence)`. Leaves get their sequence
/// numbers first, in ascending symbol order, and every combined node takes the
/// next free number. That makes equal-frequency leaves pop by symbol value,
/// leaves pop before combined nodes of the same frequency, and combined nodes
/// pop in the order they were created.
struct QueueEntry {
    frequency: u64,
    sequence: usize,
    node: Node,
}

impl QueueEntry {
    fn key(&self) -> (u64, usize) {
        (self.frequency, self.sequence)
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl CodeTree {
    /// Builds the tree by repeatedly combining the two lowest entries of a
    /// min-priority queue. The first entry popped becomes the left child.
    pub fn build(table: &FrequencyTable) -> CodeTree {
        let mut queue = BinaryHeap::with_capacity(table.distinct_symbols());
        let mut sequence = 0;
        for (symbol, frequency) in table.iter() {
            queue.push(Reverse(QueueEntry {
                frequency,
                sequence,
                node: Node::Leaf { symbol, frequency },
            }));
            sequence += 1;
        }

        loop {
            let left = match queue.pop() {
                Some(Reverse(entry)) => entry,
                None => return CodeTree { root: None },
            };
            let right = match queue.pop() {
                Some(Reverse(entry)) => entry,
                None => {
                    return CodeTree {
                        root: Some(left.node),
                    }
                }
            };

            let node = Node::merge(left.node, right.node);
            queue.push(Reverse(QueueEntry {
                frequency: node.frequency(),
                sequence,
                node,
            }));
            sequence += 1;
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit(|node, _| {
            if node.is_leaf() {
                count += 1;
            }
        });
        count
    }

    /// Depth of the deepest leaf. A lone leaf root has depth zero.
    pub fn depth(&self) -> Option<usize> {
        let mut max = None;
        self.visit(|node, depth| {
            if node.is_leaf() && max.map_or(true, |max| depth > max) {
                max = Some(depth);
            }
        });
        max
    }

    /// Calls `f` on every node in pre-order, left before right, along with its depth
    pub(crate) fn visit<F: FnMut(&Node, usize)>(&self, mut f: F) {
        let mut stack = alloc::vec::Vec::new();
        if let Some(root) = &self.root {
            stack.push((root, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            f(node, depth);
            if let Node::Internal { left, right, .. } = node {
                stack.push((right.as_ref(), depth + 1));
                stack.push((left.as_ref(), depth + 1));
            }
        }
    }
}
