//! The self-describing container that wraps a Huffman payload.
//!
//! All integers are little-endian.
//!
//! | Size | Field |
//! |---|---|
//! | 4 | [`MAGIC_NUM`] |
//! | 1 | format version, [`FORMAT_VERSION`] |
//! | 1 | flags, only [`FLAG_CONTENT_CHECKSUM`] is defined |
//! | 2 | symbol count `n` (0 to 256) |
//! | 1 | frequency width `w`: 1, 2, 4 or 8 |
//! | n * (1 + w) | symbol followed by its frequency, symbols strictly ascending |
//! | 8 | payload length in bits |
//! | 4 | content checksum, only present if the flag is set |
//! | ceil(bits / 8) | packed payload, last byte zero-padded |
//!
//! The frequency table is enough to rebuild the exact tree the encoder used,
//! see [`CodeTree::build`].

use crate::common::{ALPHABET_SIZE, FLAG_CONTENT_CHECKSUM, FORMAT_VERSION, MAGIC_NUM};
use crate::frequency::FrequencyTable;
use crate::huffman::CodeTree;
use alloc::vec::Vec;

/// Size of the part of the header that precedes the symbol entries
pub const FIXED_HEADER_SIZE: usize = 9;

/// A parsed or to-be-written container. The payload is borrowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'p> {
    frequencies: FrequencyTable,
    payload_bits: u64,
    checksum: Option<u32>,
    payload: &'p [u8],
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ContainerError {
    #[error("Container too short to hold the {section}. Is: {got} bytes, Should be at least: {need} bytes")]
    NotEnoughBytesForHeader {
        section: &'static str,
        got: usize,
        need: usize,
    },
    #[error("Bad magic number. Is: {got:#010x}, Should be: {MAGIC_NUM:#010x}")]
    BadMagicNumber { got: u32 },
    #[error("Unsupported container version. Is: {got}, Should be: {FORMAT_VERSION}")]
    UnsupportedVersion { got: u8 },
    #[error("Reserved flag bits are set: {got:#010b}")]
    ReservedFlagsSet { got: u8 },
    #[error("Symbol count {got} is larger than the {ALPHABET_SIZE} possible byte values")]
    TooManySymbols { got: u16 },
    #[error("Invalid frequency width. Is: {got}, Should be one of 1, 2, 4, 8 bytes")]
    InvalidFrequencyWidth { got: u8 },
    #[error("Header declares {symbols} symbols needing {need} bytes but only {got} bytes remain")]
    NotEnoughBytesForSymbols {
        symbols: u16,
        got: usize,
        need: usize,
    },
    #[error("Symbols must be strictly ascending but {got} follows {previous}")]
    SymbolsOutOfOrder { previous: u8, got: u8 },
    #[error("Symbol {symbol} is declared with a frequency of zero")]
    ZeroFrequency { symbol: u8 },
    #[error("Sum of the declared frequencies does not fit into 64 bits")]
    FrequencyOverflow,
    #[error("No symbols are declared but the payload has {payload_bits} bits")]
    EmptyTree { payload_bits: u64 },
    #[error("Payload of {payload_bits} bits needs {expected_bytes} bytes but {got_bytes} bytes follow the header")]
    PayloadSizeMismatch {
        payload_bits: u64,
        expected_bytes: u64,
        got_bytes: usize,
    },
}

/// Returns the minimum number of bytes needed to represent this value, as
/// either 1, 2, 4, or 8 bytes. A value of 0 will still return one byte.
pub fn find_min_size(val: u64) -> usize {
    if val >> 8 == 0 {
        return 1;
    }
    if val >> 16 == 0 {
        return 2;
    }
    if val >> 32 == 0 {
        return 4;
    }
    8
}

/// Reads little endian values off the front of a slice
struct HeaderReader<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn remaining(&self) -> usize {
        self.source.len() - self.pos
    }

    fn take(&mut self, n: usize, section: &'static str) -> Result<&'a [u8], ContainerError> {
        if self.remaining() < n {
            return Err(ContainerError::NotEnoughBytesForHeader {
                section,
                got: self.source.len(),
                need: self.pos + n,
            });
        }
        let bytes = &self.source[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn rest(self) -> &'a [u8] {
        &self.source[self.pos..]
    }
}

/// Interprets up to eight bytes as a little endian number
fn read_le(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .rev()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

impl<'p> Container<'p> {
    /// Bundles an already packed payload with the table it was coded with.
    ///
    /// # Panics
    /// Will panic if `payload` is not exactly `ceil(payload_bits / 8)` bytes long,
    /// such a container could never be deserialized.
    pub fn new(
        frequencies: FrequencyTable,
        payload_bits: u64,
        payload: &'p [u8],
        checksum: Option<u32>,
    ) -> Self {
        assert_eq!(
            payload_bits.div_ceil(8),
            payload.len() as u64,
            "payload length does not match the payload bit length"
        );
        Container {
            frequencies,
            payload_bits,
            checksum,
            payload,
        }
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// Exact number of meaningful bits in the payload
    pub fn payload_bits(&self) -> u64 {
        self.payload_bits
    }

    pub fn payload(&self) -> &'p [u8] {
        self.payload
    }

    pub fn checksum(&self) -> Option<u32> {
        self.checksum
    }

    /// Number of bytes [`Container::serialize`] writes before the payload
    pub fn header_size(&self) -> usize {
        let width = find_min_size(self.frequencies.max_count());
        let checksum = if self.checksum.is_some() { 4 } else { 0 };
        FIXED_HEADER_SIZE + self.frequencies.distinct_symbols() * (1 + width) + 8 + checksum
    }

    /// Rebuilds the tree the payload was encoded with
    pub fn code_tree(&self) -> CodeTree {
        CodeTree::build(&self.frequencies)
    }

    /// Appends the binary representation of the container to `output`
    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.reserve(self.header_size() + self.payload.len());

        let symbols = self.frequencies.distinct_symbols();
        let width = find_min_size(self.frequencies.max_count());
        let flags = if self.checksum.is_some() {
            FLAG_CONTENT_CHECKSUM
        } else {
            0
        };

        output.extend_from_slice(&MAGIC_NUM.to_le_bytes());
        output.push(FORMAT_VERSION);
        output.push(flags);
        // at most 256, always fits
        output.extend_from_slice(&(symbols as u16).to_le_bytes());
        output.push(width as u8);
        for (symbol, count) in self.frequencies.iter() {
            output.push(symbol);
            output.extend_from_slice(&count.to_le_bytes()[..width]);
        }
        output.extend_from_slice(&self.payload_bits.to_le_bytes());
        if let Some(checksum) = self.checksum {
            output.extend_from_slice(&checksum.to_le_bytes());
        }
        output.extend_from_slice(self.payload);
    }

    /// Parses a container, checking every structural property the decoder relies on.
    pub fn deserialize(source: &'p [u8]) -> Result<Container<'p>, ContainerError> {
        use ContainerError as err;

        let mut reader = HeaderReader { source, pos: 0 };

        let magic = read_le(reader.take(4, "magic number")?) as u32;
        if magic != MAGIC_NUM {
            return Err(err::BadMagicNumber { got: magic });
        }
        let version = reader.take(1, "format version")?[0];
        if version != FORMAT_VERSION {
            return Err(err::UnsupportedVersion { got: version });
        }
        let flags = reader.take(1, "flags")?[0];
        if flags & !FLAG_CONTENT_CHECKSUM != 0 {
            return Err(err::ReservedFlagsSet { got: flags });
        }
        let symbols = read_le(reader.take(2, "symbol count")?) as u16;
        if symbols as usize > ALPHABET_SIZE {
            return Err(err::TooManySymbols { got: symbols });
        }
        let width = reader.take(1, "frequency width")?[0];
        if !matches!(width, 1 | 2 | 4 | 8) {
            return Err(err::InvalidFrequencyWidth { got: width });
        }

        let entry_size = 1 + width as usize;
        let need = symbols as usize * entry_size;
        if reader.remaining() < need {
            return Err(err::NotEnoughBytesForSymbols {
                symbols,
                got: reader.remaining(),
                need,
            });
        }
        let entries = reader.take(need, "symbol table")?;

        let mut counts = [0u64; ALPHABET_SIZE];
        let mut previous: Option<u8> = None;
        let mut total: u64 = 0;
        for entry in entries.chunks_exact(entry_size) {
            let symbol = entry[0];
            let count = read_le(&entry[1..]);
            if let Some(previous) = previous {
                if symbol <= previous {
                    return Err(err::SymbolsOutOfOrder {
                        previous,
                        got: symbol,
                    });
                }
            }
            if count == 0 {
                return Err(err::ZeroFrequency { symbol });
            }
            total = total.checked_add(count).ok_or(err::FrequencyOverflow)?;
            counts[symbol as usize] = count;
            previous = Some(symbol);
        }
        let frequencies = FrequencyTable::from_counts(counts);

        let payload_bits = read_le(reader.take(8, "payload bit length")?);

        let checksum = if flags & FLAG_CONTENT_CHECKSUM != 0 {
            Some(read_le(reader.take(4, "content checksum")?) as u32)
        } else {
            None
        };

        if symbols == 0 && payload_bits > 0 {
            return Err(err::EmptyTree { payload_bits });
        }

        let payload = reader.rest();
        let expected_bytes = payload_bits.div_ceil(8);
        if expected_bytes != payload.len() as u64 {
            return Err(err::PayloadSizeMismatch {
                payload_bits,
                expected_bytes,
                got_bytes: payload.len(),
            });
        }

        vprintln!(
            "Parsed container: {} symbols, {} payload bits, checksum: {:?}",
            symbols,
            payload_bits,
            checksum
        );

        Ok(Container {
            frequencies,
            payload_bits,
            checksum,
            payload,
        })
    }
}
