//! Turning raw bytes into a Huffman container.
//!
//! ```
//! let compressed = ruhuff::encoding::compress(b"mississippi");
//! assert_eq!(ruhuff::decompress(&compressed).unwrap(), b"mississippi");
//! ```

pub mod bit_writer;
mod compressor;

pub use compressor::*;
