//! Structures and utilities used for decoding Huffman containers

pub mod bit_reader;
pub mod errors;
pub mod huffman_decoder;
mod decompressor;

pub use decompressor::*;
pub use errors::{DecodeError, DecompressError};
