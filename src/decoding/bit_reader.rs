use core::convert::TryFrom;

/// Reads bits MSB-first out of a byte slice, stopping after a fixed number of
/// bits so the zero padding of the last byte is never returned.
pub struct BitReader<'s> {
    idx: u64, //index counts bits already read
    bit_len: u64,
    source: &'s [u8],
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum GetBitsError {
    #[error("Cant serve this request. The reader is limited to {limit} bits, requested {num_requested_bits} bits")]
    TooManyBits {
        num_requested_bits: usize,
        limit: u8,
    },
    #[error("Can't read {requested} bits, only have {remaining} bits left")]
    NotEnoughRemainingBits { requested: usize, remaining: u64 },
    #[error("Declared {bit_len} bits but the source only holds {available} bits")]
    SourceTooShort { bit_len: u64, available: u64 },
}

impl<'s> BitReader<'s> {
    /// Creates a reader over the first `bit_len` bits of `source`.
    pub fn new(source: &'s [u8], bit_len: u64) -> Result<BitReader<'s>, GetBitsError> {
        let available = (source.len() as u64).saturating_mul(8);
        if bit_len > available {
            return Err(GetBitsError::SourceTooShort { bit_len, available });
        }
        Ok(BitReader {
            idx: 0,
            bit_len,
            source,
        })
    }

    pub fn bits_left(&self) -> u64 {
        self.bit_len - self.idx
    }

    pub fn bits_read(&self) -> u64 {
        self.idx
    }

    pub fn is_empty(&self) -> bool {
        self.bits_left() == 0
    }

    pub fn get_bit(&mut self) -> Result<bool, GetBitsError> {
        if self.idx >= self.bit_len {
            return Err(GetBitsError::NotEnoughRemainingBits {
                requested: 1,
                remaining: 0,
            });
        }
        let byte = self.source[(self.idx / 8) as usize];
        let bit = (byte >> (7 - self.idx % 8)) & 1 == 1;
        self.idx += 1;
        Ok(bit)
    }

    /// Reads `n` bits, the first one read ending up as the most significant
    /// of the returned value.
    pub fn get_bits(&mut self, n: usize) -> Result<u64, GetBitsError> {
        if n > 64 {
            return Err(GetBitsError::TooManyBits {
                num_requested_bits: n,
                limit: 64,
            });
        }
        if self.bits_left() < n as u64 {
            return Err(GetBitsError::NotEnoughRemainingBits {
                requested: n,
                remaining: self.bits_left(),
            });
        }

        let mut value = 0u64;
        let mut remaining = n as u64;
        while remaining > 0 {
            let bits_left_in_current_byte = 8 - self.idx % 8;
            let take = bits_left_in_current_byte.min(remaining);
            let byte = u64::from(self.source[(self.idx / 8) as usize]);
            // drop the bits after the ones we want, then mask the ones before
            let chunk = (byte >> (bits_left_in_current_byte - take)) & ((1u64 << take) - 1);
            value = (value << take) | chunk;
            self.idx += take;
            remaining -= take;
        }

        Ok(value)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.get_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.bits_left()).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}
