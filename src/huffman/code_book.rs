use super::{Code, CodeTree, Node};
use crate::common::{ALPHABET_SIZE, MAX_CODE_LEN};
use crate::frequency::FrequencyTable;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Maps every symbol of a [`CodeTree`] to its code.
#[derive(Clone, PartialEq, Eq)]
pub struct CodeBook {
    /// Index is the symbol, `None` for symbols the tree does not contain
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeBook {
    /// Walks the tree once, appending a `0` for every step to the left and a
    /// `1` for every step to the right. A tree that is a single leaf assigns
    /// the one bit code `0` to its symbol.
    pub fn derive(tree: &CodeTree) -> CodeBook {
        let mut book = CodeBook {
            codes: [None; ALPHABET_SIZE],
        };

        let root = match tree.root() {
            Some(root) => root,
            None => return book,
        };

        let mut stack: Vec<(&Node, Code)> = Vec::new();
        match root {
            Node::Leaf { symbol, .. } => {
                book.codes[*symbol as usize] = Some(Code::EMPTY.push(false));
            }
            Node::Internal { .. } => stack.push((root, Code::EMPTY)),
        }

        while let Some((node, code)) = stack.pop() {
            match node {
                Node::Leaf { symbol, .. } => {
                    book.codes[*symbol as usize] = Some(code);
                }
                Node::Internal { left, right, .. } => {
                    debug_assert!(code.len() < MAX_CODE_LEN);
                    stack.push((right.as_ref(), code.push(true)));
                    stack.push((left.as_ref(), code.push(false)));
                }
            }
        }

        vprintln!("Derived {} codes", book.len());
        book
    }

    pub fn code(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(|code| code.is_none())
    }

    /// Iterates over `(symbol, code)` in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|code| (symbol as u8, code)))
    }

    /// The inverse mapping from code to symbol
    pub fn inverse(&self) -> BTreeMap<Code, u8> {
        self.iter().map(|(symbol, code)| (code, symbol)).collect()
    }

    /// Finds the symbol that has exactly this code
    pub fn symbol_for(&self, code: &Code) -> Option<u8> {
        self.iter()
            .find(|(_, candidate)| candidate == code)
            .map(|(symbol, _)| symbol)
    }

    pub fn max_code_len(&self) -> u8 {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Number of bits needed to encode an input with these frequencies:
    /// the sum of `frequency * code length` over all symbols.
    ///
    /// Symbols of `table` without a code are ignored. Saturates at `u64::MAX`.
    pub fn encoded_bit_len(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .filter_map(|(symbol, count)| {
                self.code(symbol)
                    .map(|code| count.saturating_mul(u64::from(code.len())))
            })
            .fold(0u64, u64::saturating_add)
    }
}

impl core::fmt::Debug for CodeBook {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::CodeBook;
    use crate::frequency::FrequencyTable;
    use crate::huffman::{Code, CodeTree};
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use rand::{Rng, SeedableRng};

    fn book_for(data: &[u8]) -> CodeBook {
        CodeBook::derive(&CodeTree::build(&FrequencyTable::build(data)))
    }

    fn code_str(book: &CodeBook, symbol: u8) -> String {
        book.code(symbol).unwrap().to_string()
    }

    #[test]
    fn abracadabra_codes() {
        let book = book_for(b"abracadabra");
        assert_eq!(code_str(&book, b'a'), "0");
        assert_eq!(code_str(&book, b'c'), "100");
        assert_eq!(code_str(&book, b'd'), "101");
        assert_eq!(code_str(&book, b'b'), "110");
        assert_eq!(code_str(&book, b'r'), "111");
        assert_eq!(book.code(b'z'), None);
        assert_eq!(book.len(), 5);
        assert_eq!(book.max_code_len(), 3);
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let book = book_for(b"aaaa");
        assert_eq!(book.code(b'a'), Code::new(0, 1));
        assert_eq!(book.len(), 1);
        assert_eq!(
            book.encoded_bit_len(&FrequencyTable::build(b"aaaa")),
            4
        );
    }

    #[test]
    fn empty_tree_has_no_codes() {
        let book = book_for(&[]);
        assert!(book.is_empty());
        assert_eq!(book.iter().count(), 0);
        assert_eq!(book.max_code_len(), 0);
    }

    #[test]
    fn inverse_maps_back() {
        let book = book_for(b"mississippi river");
        let inverse = book.inverse();
        assert_eq!(inverse.len(), book.len());
        for (symbol, code) in book.iter() {
            assert_eq!(inverse[&code], symbol);
            assert_eq!(book.symbol_for(&code), Some(symbol));
        }
        assert_eq!(book.symbol_for(&Code::new(0, 20).unwrap()), None);
    }

    #[test]
    fn prefix_free() {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(0xC0DE);
        for _ in 0..20 {
            let len = rng.gen_range(1..4096);
            // skewed distribution to get codes of many different lengths
            let data: Vec<u8> = (0..len)
                .map(|_| {
                    let x: u32 = rng.gen_range(0..1024);
                    (x * x / 4096) as u8
                })
                .collect();
            let book = book_for(&data);
            let codes: Vec<Code> = book.iter().map(|(_, code)| code).collect();
            for (i, a) in codes.iter().enumerate() {
                assert!(!a.is_empty());
                for (j, b) in codes.iter().enumerate() {
                    if i != j {
                        assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn all_byte_values_get_eight_bits() {
        let data: Vec<u8> = (0..=255u8).collect();
        let book = book_for(&data);
        assert_eq!(book.len(), 256);
        assert!(book.iter().all(|(_, code)| code.len() == 8));
        assert_eq!(book.encoded_bit_len(&FrequencyTable::build(&data)), 2048);
    }

    #[test]
    fn frequent_symbols_get_shorter_codes() {
        let mut data = Vec::new();
        data.extend(core::iter::repeat(b'x').take(1000));
        data.extend(core::iter::repeat(b'y').take(100));
        data.extend(core::iter::repeat(b'z').take(10));
        data.push(b'w');
        let book = book_for(&data);
        let len = |s: u8| book.code(s).unwrap().len();
        assert!(len(b'x') <= len(b'y'));
        assert!(len(b'y') <= len(b'z'));
        assert!(len(b'z') <= len(b'w'));
    }
}
