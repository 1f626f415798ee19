//! Huffman coding is a method of encoding where symbols are assigned a code,
//! and more commonly used symbols get shorter codes, and less commonly
//! used symbols get longer codes. Codes are prefix free, meaning no code
//! is the start of another code.
//!
//! The tree is built from a [`FrequencyTable`](crate::FrequencyTable) with a
//! fixed tie-break rule, so one table always produces the same tree and the
//! decoder can rebuild the encoder's tree from the table alone.

mod code;
mod code_book;
mod code_tree;

pub use code::*;
pub use code_book::*;
pub use code_tree::*;

/// Encodes `data` symbol by symbol and walks the tree to decode it again,
/// panicking if anything does not match up. Used by the fuzzer.
#[cfg(any(test, feature = "fuzz_exports"))]
pub fn round_trip(data: &[u8]) {
    use crate::decoding::bit_reader::BitReader;
    use crate::decoding::huffman_decoder::HuffmanDecoder;
    use crate::encoding::bit_writer::BitWriter;
    use crate::frequency::FrequencyTable;

    let table = FrequencyTable::build(data);
    let tree = CodeTree::build(&table);
    let book = CodeBook::derive(&tree);
    assert_eq!(book.len(), table.distinct_symbols());
    assert_eq!(tree.leaf_count(), table.distinct_symbols());

    let mut writer = BitWriter::new();
    for &symbol in data {
        writer.write_code(book.code(symbol).unwrap());
    }
    let (encoded, bits) = writer.finish();
    assert_eq!(bits, book.encoded_bit_len(&table));

    let decoder = match HuffmanDecoder::new(&tree) {
        Some(decoder) => decoder,
        None => {
            assert!(data.is_empty());
            return;
        }
    };
    let mut br = BitReader::new(&encoded, bits).unwrap();
    for &symbol in data {
        assert_eq!(decoder.decode_symbol(&mut br).unwrap(), symbol);
    }
    assert!(br.is_empty());
}

#[test]
fn roundtrip() {
    round_trip(&[]);
    round_trip(b"x");
    round_trip(&(0..=255).collect::<alloc::vec::Vec<u8>>());
    let mut data = alloc::vec![];
    data.extend(0..32);
    data.extend(0..32);
    data.extend(20..32);
    data.extend(100..255);
    data.extend(20..32);
    round_trip(&data);

    #[cfg(feature = "std")]
    if std::fs::exists("fuzz/artifacts/round_trip").unwrap_or(false) {
        for file in std::fs::read_dir("fuzz/artifacts/round_trip").unwrap() {
            if file.as_ref().unwrap().file_type().unwrap().is_file() {
                let data = std::fs::read(file.unwrap().path()).unwrap();
                round_trip(&data);
            }
        }
    }
}
