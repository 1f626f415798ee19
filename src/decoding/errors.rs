//! Errors that might occur while decoding a container.
//!
//! Structural problems of the container itself are reported as
//! [`ContainerError`], problems found while unpacking the payload as
//! [`DecodeError`]. [`DecompressError`] covers both.

pub use super::bit_reader::GetBitsError;
pub use crate::container::ContainerError;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    GetBitsError(#[from] GetBitsError),
    #[error("Payload ended in the middle of a code after {bits_read} bits")]
    UnexpectedEndOfPayload { bits_read: u64 },
    #[error("Only the code 0 exists but bit {bit_index} of the payload is a 1")]
    InvalidSingleSymbolCode { bit_index: u64 },
    #[error("All {expected} symbols are decoded but {bits_left} payload bits are left over")]
    TrailingBits { expected: u64, bits_left: u64 },
    #[error("Payload ran out after {got} symbols, the frequency table declares {expected}")]
    SymbolCountMismatch { expected: u64, got: u64 },
    #[error("Symbol {symbol} was decoded {got} times, the frequency table declares {expected}")]
    FrequencyMismatch { symbol: u8, expected: u64, got: u64 },
    #[error("Content checksum mismatch. Is: {got:#010x}, Should be: {expected:#010x}")]
    ChecksumMismatch { expected: u32, got: u32 },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecompressError {
    #[error(transparent)]
    ContainerError(#[from] ContainerError),
    #[error(transparent)]
    DecodeError(#[from] DecodeError),
}

impl From<GetBitsError> for DecompressError {
    fn from(val: GetBitsError) -> Self {
        DecompressError::DecodeError(val.into())
    }
}

#[cfg(feature = "std")]
impl From<DecompressError> for std::io::Error {
    fn from(val: DecompressError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, val)
    }
}
