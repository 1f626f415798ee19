//! The encoding pipeline: count symbols, build the tree, derive codes, pack.

use super::bit_writer::BitWriter;
use crate::container::Container;
use crate::frequency::FrequencyTable;
use crate::huffman::{CodeBook, CodeTree};
use alloc::vec::Vec;
use core::convert::TryFrom;

/// Compresses `data` into a self-contained container.
///
/// Never fails. The same input always produces the same bytes for a given
/// set of crate features.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::new();
    compress_to_vec(data, &mut output);
    output
}

/// Like [`compress`] but appends to an existing buffer.
///
/// Returns the number of bytes appended.
pub fn compress_to_vec(data: &[u8], output: &mut Vec<u8>) -> usize {
    let start = output.len();

    let frequencies = FrequencyTable::build(data);
    vprintln!(
        "Counted {} distinct symbols in {} bytes",
        frequencies.distinct_symbols(),
        data.len()
    );

    let tree = CodeTree::build(&frequencies);
    let book = CodeBook::derive(&tree);
    let (payload, payload_bits) = pack(data, &book, &frequencies);

    #[cfg(feature = "hash")]
    let checksum = Some(crate::common::content_checksum(data));
    #[cfg(not(feature = "hash"))]
    let checksum = None;

    Container::new(frequencies, payload_bits, &payload, checksum).serialize(output);

    vprintln!(
        "Packed {} bytes into {} payload bits, {} bytes total",
        data.len(),
        payload_bits,
        output.len() - start
    );
    output.len() - start
}

/// Concatenates the code of every input byte.
fn pack(data: &[u8], book: &CodeBook, frequencies: &FrequencyTable) -> (Vec<u8>, u64) {
    let expected_bits = book.encoded_bit_len(frequencies);
    let capacity = usize::try_from(expected_bits.div_ceil(8)).unwrap_or(0);
    let mut writer = BitWriter::with_capacity(capacity);

    for &byte in data {
        // every byte of data was counted, so every byte has a code
        if let Some(code) = book.code(byte) {
            writer.write_code(code);
        }
    }

    debug_assert_eq!(writer.bits_written(), expected_bits);
    writer.finish()
}

/// Reads all of `source`, compresses it and writes the container to `drain`.
///
/// Returns the number of bytes written. The whole input is buffered since the
/// frequency table has to be known before the first code can be emitted.
#[cfg(feature = "std")]
pub fn compress_stream<R: std::io::Read, W: std::io::Write>(
    mut source: R,
    mut drain: W,
) -> std::io::Result<u64> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    let compressed = compress(&data);
    drain.write_all(&compressed)?;
    drain.flush()?;
    Ok(compressed.len() as u64)
}
