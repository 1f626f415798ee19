use crate::huffman::Code;
use alloc::vec::Vec;

/// An interface for writing an arbitrary number of bits into a buffer
pub struct BitWriter {
    /// The buffer that's filled with bits
    output: Vec<u8>,
    /// The index pointing to the next unoccupied bit. Effectively just
    /// the number of bits that have been written into the buffer so far.
    bit_idx: u64,
}

impl BitWriter {
    /// Initialize a new writer. Write new bits into the buffer with `write_bits`, and
    /// obtain the output using `finish`
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Like [`BitWriter::new`] but reserves room for `bytes` bytes of output
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            bit_idx: 0,
        }
    }

    /// Write the lower `num_bits` of `bits` into the writer.
    ///
    /// The bits are taken starting from the *most significant* of those
    /// `num_bits` and land in the output starting at the most significant
    /// free position of the current byte.
    ///
    /// # Panics
    /// Will panic if `num_bits` is larger than 64.
    pub fn write_bits(&mut self, bits: u64, num_bits: u8) {
        assert!(num_bits <= 64, "Cant write more than 64 bits at once");
        let mut remaining = num_bits;
        while remaining > 0 {
            let used_in_current_byte = (self.bit_idx % 8) as u8;
            if used_in_current_byte == 0 {
                self.output.push(0);
            }
            let free_bits_in_current_byte = 8 - used_in_current_byte;
            let num_bits_being_added = free_bits_in_current_byte.min(remaining);

            // Cut the next `num_bits_being_added` bits out of the input and move them
            // right behind the bits already in the byte
            //
            // 76543210 ◄─── Bit Index
            // 111─────  ◄── Data already in buffer
            //    00───  ◄── New data, shifted left by (free - added)
            let chunk = (bits >> (remaining - num_bits_being_added))
                & ((1u64 << num_bits_being_added) - 1);
            let aligned = (chunk as u8) << (free_bits_in_current_byte - num_bits_being_added);
            if let Some(last) = self.output.last_mut() {
                *last |= aligned;
            }

            remaining -= num_bits_being_added;
            self.bit_idx += u64::from(num_bits_being_added);
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u64::from(bit), 1);
    }

    /// Appends all bits of `code`, first bit first
    pub fn write_code(&mut self, code: Code) {
        let len = code.len();
        if len > 64 {
            self.write_bits((code.bits() >> 64) as u64, len - 64);
            self.write_bits(code.bits() as u64, 64);
        } else {
            self.write_bits(code.bits() as u64, len);
        }
    }

    /// Number of bits written so far, without padding
    pub fn bits_written(&self) -> u64 {
        self.bit_idx
    }

    /// Returns the populated buffer along with the exact number of bits that were written.
    ///
    /// Unused bits of the last byte are zero. This function consumes the writer,
    /// so it cannot be used after finishing.
    pub fn finish(self) -> (Vec<u8>, u64) {
        (self.output, self.bit_idx)
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
