//! Archive-level error kinds.
//!
//! Per-file errors during pack/extract never become one of these, they
//! are logged and the file is skipped so the operation continues. These
//! variants only surface for failures that abort the whole operation.

#[derive(thiserror::Error, Debug)]
pub enum PacError {
    #[error("failed to open archive: {0}")]
    IoOpen(#[source] std::io::Error),
    #[error("failed to read archive")]
    IoRead(#[source] std::io::Error),
    #[error("failed to write archive")]
    IoWrite(#[source] std::io::Error),
    #[error("not a PAC archive (bad magic)")]
    BadMagic,
    #[error("entry name too long: {0}")]
    NameTooLong(String),
    #[error("compression failed")]
    CompressFailed,
    #[error("decompression failed")]
    DecompressFailed,
    #[error("bit stream exhausted before decode completed")]
    BitStreamExhausted,
    #[error("huffman tree malformed or truncated")]
    TreeMalformed,
}
