//! # pactool
//!
//! Pack and unpack `PACu` archives: a directory tree bundled into a single
//! file with per-entry payload compression and a Huffman-coded,
//! bit-obfuscated index.
//!
//! * `archive::writer` builds an archive from a directory.
//! * `archive::reader` extracts an archive into a directory.
//! * `huffman` is the index codec; `bitio` is the bit-level primitive it's
//!   built on.
//! * `compression` adapts the per-entry payload methods (store, zlib, zstd).
//!
//! ## Example
//!
//! ```rs
//! use pactool::archive::writer::pack;
//! use pactool::compression::Method;
//! pack(std::path::Path::new("assets"), std::path::Path::new("out.pac"), Method::Zlib, 0)
//!     .expect("pack failed");
//! ```

pub mod archive;
pub mod bitio;
pub mod codepage;
pub mod compression;
pub mod entry;
pub mod error;
pub mod huffman;
pub mod walker;
pub mod workers;

pub use error::PacError;
