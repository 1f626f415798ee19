//! A Huffman compressor whose output carries everything needed to decode it.
//!
//! ```
//! let data = b"abracadabra";
//! let compressed = ruhuff::compress(data);
//! let decompressed = ruhuff::decompress(&compressed).unwrap();
//! assert_eq!(&decompressed[..], &data[..]);
//! ```
#![no_std]
#![deny(trivial_casts, trivial_numeric_casts, rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

#[cfg(feature = "std")]
pub const VERBOSE: bool = false;

macro_rules! vprintln {
    ($($x:expr),*) => {
        #[cfg(feature = "std")]
        if crate::VERBOSE {
            std::println!($($x),*);
        }
    }
}

pub mod common;
pub mod container;
pub mod decoding;
pub mod encoding;
pub mod frequency;
pub mod huffman;
mod tests;

pub use container::{Container, ContainerError};
pub use decoding::{decompress, DecodeError, DecompressError};
pub use encoding::compress;
pub use frequency::FrequencyTable;
pub use huffman::{Code, CodeBook, CodeTree};
