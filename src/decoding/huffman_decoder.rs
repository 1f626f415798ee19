use super::bit_reader::BitReader;
use super::errors::DecodeError;
use crate::huffman::{CodeTree, Node};

/// Decodes one symbol at a time by walking a [`CodeTree`] from the root,
/// `0` going left and `1` going right, until a leaf is reached.
pub struct HuffmanDecoder<'tree> {
    root: &'tree Node,
}

impl<'t> HuffmanDecoder<'t> {
    /// Returns `None` for an empty tree, which cannot decode anything.
    pub fn new(tree: &'t CodeTree) -> Option<HuffmanDecoder<'t>> {
        tree.root().map(|root| HuffmanDecoder { root })
    }

    pub fn decode_symbol(&self, br: &mut BitReader<'_>) -> Result<u8, DecodeError> {
        // A lone leaf has the one bit code 0
        if let Node::Leaf { symbol, .. } = self.root {
            let bit_index = br.bits_read();
            return match br.get_bit()? {
                false => Ok(*symbol),
                true => Err(DecodeError::InvalidSingleSymbolCode { bit_index }),
            };
        }

        let mut node = self.root;
        loop {
            match node {
                Node::Leaf { symbol, .. } => return Ok(*symbol),
                Node::Internal { left, right, .. } => {
                    let bit = br
                        .get_bit()
                        .map_err(|_| DecodeError::UnexpectedEndOfPayload {
                            bits_read: br.bits_read(),
                        })?;
                    node = if bit { right.as_ref() } else { left.as_ref() };
                }
            }
        }
    }
}
