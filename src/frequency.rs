//! Contains [`FrequencyTable`], which counts how often
//! every byte value occurs in an input.

use crate::common::ALPHABET_SIZE;

/// Number of occurrences of each of the 256 byte values.
///
/// Only symbols with a count greater than zero are considered present.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// A table without any symbols, as produced by an empty input.
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Counts every byte of `data`.
    pub fn build(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.counts[byte as usize] += 1;
        }
        table
    }

    /// Builds a table directly from per-symbol counts, indexed by symbol.
    pub fn from_counts(counts: [u64; ALPHABET_SIZE]) -> Self {
        FrequencyTable { counts }
    }

    /// Sets the count of `symbol`, returning the previous one.
    pub fn insert(&mut self, symbol: u8, count: u64) -> u64 {
        core::mem::replace(&mut self.counts[symbol as usize], count)
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// How many different symbols have a non-zero count
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Sum of all counts, which is the length of the counted input.
    ///
    /// Returns `None` if the sum does not fit into a `u64`, which can only
    /// happen for tables that were not produced by [`FrequencyTable::build`].
    pub fn total(&self) -> Option<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |acc, &count| acc.checked_add(count))
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Iterates over the present symbols and their counts in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, count)| (symbol as u8, *count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
