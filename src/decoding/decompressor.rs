//! The decoding pipeline: parse the container, rebuild the tree, unpack.

use super::bit_reader::BitReader;
use super::errors::{DecodeError, DecompressError};
use super::huffman_decoder::HuffmanDecoder;
use crate::common::ALPHABET_SIZE;
use crate::container::{Container, ContainerError};
use alloc::vec::Vec;
use core::convert::TryFrom;

/// Restores the original input from a container produced by
/// [`compress`](crate::encoding::compress).
///
/// Any input that is not a well formed container is rejected with an error,
/// this function never panics.
///
/// A stored content checksum is only verified when the `hash` feature is
/// enabled. Without it the checksum is parsed and then ignored, so a payload
/// that decodes consistently with its frequency table is accepted even if the
/// checksum would not match.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, DecompressError> {
    let mut output = Vec::new();
    decompress_to_vec(data, &mut output)?;
    Ok(output)
}

/// Like [`decompress`] but appends to an existing buffer.
///
/// Returns the number of bytes appended. On error `output` may contain part of
/// the decoded data.
pub fn decompress_to_vec(data: &[u8], output: &mut Vec<u8>) -> Result<usize, DecompressError> {
    let container = Container::deserialize(data)?;
    let start = output.len();
    unpack(&container, output)?;
    verify_checksum(&container, &output[start..])?;
    Ok(output.len() - start)
}

/// Decodes exactly as many symbols as the frequency table declares and checks
/// that every symbol occurred as often as declared.
fn unpack(container: &Container<'_>, output: &mut Vec<u8>) -> Result<(), DecompressError> {
    let expected = container
        .frequencies()
        .total()
        .ok_or(ContainerError::FrequencyOverflow)?;

    let tree = container.code_tree();
    let decoder = match HuffmanDecoder::new(&tree) {
        Some(decoder) => decoder,
        // the container guarantees an empty payload for an empty table
        None => return Ok(()),
    };

    // every symbol takes at least one bit, so a lying table can't make us over-allocate
    let capacity = expected.min(container.payload_bits());
    output.reserve(usize::try_from(capacity).unwrap_or(0));

    let mut br = BitReader::new(container.payload(), container.payload_bits())?;
    let mut decoded_counts = [0u64; ALPHABET_SIZE];
    let mut decoded: u64 = 0;
    while !br.is_empty() {
        if decoded == expected {
            return Err(DecodeError::TrailingBits {
                expected,
                bits_left: br.bits_left(),
            }
            .into());
        }
        let symbol = decoder.decode_symbol(&mut br)?;
        decoded_counts[symbol as usize] += 1;
        decoded += 1;
        output.push(symbol);
    }

    if decoded != expected {
        return Err(DecodeError::SymbolCountMismatch {
            expected,
            got: decoded,
        }
        .into());
    }

    for (symbol, &got) in decoded_counts.iter().enumerate() {
        let symbol = symbol as u8;
        let expected = container.frequencies().count(symbol);
        if got != expected {
            return Err(DecodeError::FrequencyMismatch {
                symbol,
                expected,
                got,
            }
            .into());
        }
    }

    vprintln!(
        "Decoded {} symbols from {} payload bits",
        decoded,
        container.payload_bits()
    );
    Ok(())
}

#[cfg(feature = "hash")]
fn verify_checksum(container: &Container<'_>, decoded: &[u8]) -> Result<(), DecodeError> {
    if let Some(expected) = container.checksum() {
        let got = crate::common::content_checksum(decoded);
        if got != expected {
            return Err(DecodeError::ChecksumMismatch { expected, got });
        }
    }
    Ok(())
}

#[cfg(not(feature = "hash"))]
fn verify_checksum(container: &Container<'_>, _decoded: &[u8]) -> Result<(), DecodeError> {
    if container.checksum().is_some() {
        vprintln!("Container carries a checksum but the hash feature is disabled, skipping");
    }
    Ok(())
}

/// Reads a whole container from `source` and writes the decoded bytes to `drain`.
///
/// Returns the number of bytes written. Decoding errors are reported with
/// [`std::io::ErrorKind::InvalidData`] and the [`DecompressError`] as inner error.
#[cfg(feature = "std")]
pub fn decompress_stream<R: std::io::Read, W: std::io::Write>(
    mut source: R,
    mut drain: W,
) -> std::io::Result<u64> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    let decompressed = decompress(&data)?;
    drain.write_all(&decompressed)?;
    drain.flush()?;
    Ok(decompressed.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::{decompress, decompress_to_vec};
    use crate::container::{Container, ContainerError};
    use crate::decoding::errors::{DecodeError, DecompressError};
    use crate::encoding::compress;
    use crate::frequency::FrequencyTable;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Builds a container by hand, payload and table can disagree
    fn container(table: &[(u8, u64)], payload: &[u8], bits: u64) -> Vec<u8> {
        let mut frequencies = FrequencyTable::new();
        for &(symbol, count) in table {
            frequencies.insert(symbol, count);
        }
        let mut output = Vec::new();
        Container::new(frequencies, bits, payload, None).serialize(&mut output);
        output
    }

    #[test]
    fn decodes_hand_built_container() {
        // b pops first and becomes the left child: b=0 a=1
        let data = container(&[(b'a', 2), (b'b', 1)], &[0b1010_0000], 3);
        assert_eq!(decompress(&data).unwrap(), b"aba");
    }

    #[test]
    fn empty_container() {
        let data = container(&[], &[], 0);
        assert_eq!(decompress(&data).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn appends_to_existing_buffer() {
        let compressed = compress(b"tail");
        let mut output = vec![b'>'];
        assert_eq!(decompress_to_vec(&compressed, &mut output), Ok(4));
        assert_eq!(output, b">tail");
    }

    #[test]
    fn bits_left_after_all_symbols() {
        // table says two symbols, payload holds three
        let data = container(&[(b'a', 1), (b'b', 1)], &[0b0100_0000], 3);
        assert_eq!(
            decompress(&data),
            Err(DecompressError::DecodeError(DecodeError::TrailingBits {
                expected: 2,
                bits_left: 1
            }))
        );
    }

    #[test]
    fn payload_runs_out() {
        let data = container(&[(b'a', 3), (b'b', 1)], &[0b0100_0000], 2);
        assert_eq!(
            decompress(&data),
            Err(DecompressError::DecodeError(
                DecodeError::SymbolCountMismatch {
                    expected: 4,
                    got: 2
                }
            ))
        );
    }

    #[test]
    fn histogram_must_match() {
        // right number of symbols, wrong distribution: "bba"
        let data = container(&[(b'a', 2), (b'b', 1)], &[0b0010_0000], 3);
        assert_eq!(
            decompress(&data),
            Err(DecompressError::DecodeError(DecodeError::FrequencyMismatch {
                symbol: b'a',
                expected: 2,
                got: 1
            }))
        );
    }

    #[test]
    fn code_cut_off() {
        // a=0 b=10 c=11, the third code is cut off after its first bit
        let data = container(&[(b'a', 2), (b'b', 1), (b'c', 1)], &[0b0010_0000], 3);
        assert_eq!(
            decompress(&data),
            Err(DecompressError::DecodeError(
                DecodeError::UnexpectedEndOfPayload { bits_read: 3 }
            ))
        );
    }

    #[test]
    fn single_symbol_one_bit() {
        let data = container(&[(b'x', 2)], &[0b0100_0000], 2);
        assert_eq!(
            decompress(&data),
            Err(DecompressError::DecodeError(
                DecodeError::InvalidSingleSymbolCode { bit_index: 1 }
            ))
        );
    }

    #[test]
    fn structural_errors_pass_through() {
        assert_eq!(
            decompress(&[]),
            Err(DecompressError::ContainerError(
                ContainerError::NotEnoughBytesForHeader {
                    section: "magic number",
                    got: 0,
                    need: 4
                }
            ))
        );
    }

    /// Like [`container`] but with a stored checksum
    fn container_with_checksum(
        table: &[(u8, u64)],
        payload: &[u8],
        bits: u64,
        checksum: u32,
    ) -> Vec<u8> {
        let mut frequencies = FrequencyTable::new();
        for &(symbol, count) in table {
            frequencies.insert(symbol, count);
        }
        let mut output = Vec::new();
        Container::new(frequencies, bits, payload, Some(checksum)).serialize(&mut output);
        output
    }

    #[cfg(not(feature = "hash"))]
    #[test]
    fn checksum_ignored_without_hash() {
        let data =
            container_with_checksum(&[(b'a', 2), (b'b', 1)], &[0b1010_0000], 3, 0xdead_beef);
        assert_eq!(
            Container::deserialize(&data).unwrap().checksum(),
            Some(0xdead_beef)
        );
        assert_eq!(decompress(&data).unwrap(), b"aba");
    }

    #[cfg(feature = "hash")]
    #[test]
    fn wrong_checksum_rejected() {
        let data =
            container_with_checksum(&[(b'a', 2), (b'b', 1)], &[0b1010_0000], 3, 0xdead_beef);
        assert_eq!(
            decompress(&data),
            Err(DecompressError::DecodeError(DecodeError::ChecksumMismatch {
                expected: 0xdead_beef,
                got: crate::common::content_checksum(b"aba")
            }))
        );
    }

    #[cfg(feature = "hash")]
    #[test]
    fn checksum_catches_reordered_payload() {
        // "ab" and "ba" have the same table and payload length
        let ab = compress(b"ab");
        let ba = compress(b"ba");
        let payload_at = ab.len() - 1;
        let mut forged = ab.clone();
        forged[payload_at] = ba[payload_at];
        assert!(matches!(
            decompress(&forged),
            Err(DecompressError::DecodeError(
                DecodeError::ChecksumMismatch { .. }
            ))
        ));
    }

    #[cfg(feature = "std")]
    #[test]
    fn stream_reports_invalid_data() {
        let mut drain = Vec::new();
        let err = super::decompress_stream(&b"not a container"[..], &mut drain).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(drain.is_empty());

        let compressed = compress(b"round and round");
        let written = super::decompress_stream(compressed.as_slice(), &mut drain).unwrap();
        assert_eq!(written, 15);
        assert_eq!(drain, b"round and round");
    }
}
