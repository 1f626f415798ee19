use crate::common::MAX_CODE_LEN;
use core::fmt;

/// A single code word.
///
/// The bits live in the lower `len` bits of a `u128`, the first bit of the
/// code being the most significant of those.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// The code of length zero, only used as the starting point of a traversal
    pub const EMPTY: Code = Code { bits: 0, len: 0 };

    /// Creates a code from the lower `len` bits of `bits`.
    ///
    /// Returns `None` if `len` is larger than [`MAX_CODE_LEN`] or `bits` has
    /// bits set above `len`.
    pub fn new(bits: u128, len: u8) -> Option<Code> {
        if len > MAX_CODE_LEN {
            return None;
        }
        if len < MAX_CODE_LEN && bits >> len != 0 {
            return None;
        }
        Some(Code { bits, len })
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns this code extended by one bit
    pub fn push(self, bit: bool) -> Code {
        debug_assert!(self.len < MAX_CODE_LEN, "code outgrew its storage");
        Code {
            bits: (self.bits << 1) | u128::from(bit),
            len: self.len + 1,
        }
    }

    /// Bit at `idx`, counted from the start of the code
    ///
    /// # Panics
    /// Will panic if `idx` is not smaller than [`Code::len`].
    pub fn bit(&self, idx: u8) -> bool {
        assert!(idx < self.len, "bit index out of range");
        (self.bits >> (self.len - 1 - idx)) & 1 == 1
    }

    /// Iterates over the bits of the code from first to last
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.bit(idx))
    }

    /// True if `other` starts with this code. Every code is a prefix of itself.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        let shifted = other
            .bits
            .checked_shr(u32::from(other.len - self.len))
            .unwrap_or(0);
        shifted == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}
