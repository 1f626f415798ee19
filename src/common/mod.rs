//! Values shared between the encoding side
//! and the decoding side.

// --- CONTAINER ---
/// This magic number is included at the start of every container
pub const MAGIC_NUM: u32 = 0x4655_4852;
/// The only container layout this crate reads and writes
pub const FORMAT_VERSION: u8 = 1;
/// Set in the flags byte when a content checksum follows the payload bit length
pub const FLAG_CONTENT_CHECKSUM: u8 = 0b0000_0001;
/// Seed used for the xxhash64 content checksum
pub const CHECKSUM_SEED: u64 = 0;

// --- SYMBOLS ---
/// Every byte value is a symbol
pub const ALPHABET_SIZE: usize = 256;
/// Codes are stored MSB-first in a `u128`.
///
/// With frequencies summing to at most `u64::MAX` a Huffman tree cannot get
/// deeper than ~92 levels, so this is never reached.
pub const MAX_CODE_LEN: u8 = 128;

/// Computes the content checksum stored in a container: the lower 32 bits of
/// XXH64 over the original input.
#[cfg(feature = "hash")]
pub fn content_checksum(data: &[u8]) -> u32 {
    twox_hash::XxHash64::oneshot(CHECKSUM_SEED, data) as u32
}
