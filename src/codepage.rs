//! Optional filename transcoding.
//!
//! The archive's name field is raw locale bytes with no declared encoding.
//! By default this crate preserves those bytes exactly, matching the
//! format's original behavior; transcoding through a named codepage is
//! opt-in, standing in for the platform codepage-conversion APIs the
//! original relied on.

use encoding_rs::Encoding;

/// Resolve a codepage label (e.g. `"gbk"`, `"shift-jis"`, `"windows-1252"`)
/// to an [`Encoding`]. Returns `None` for unrecognized labels.
pub fn resolve(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

/// Decode raw entry-name bytes into a `String` using `encoding`, or as raw
/// UTF-8-lossy bytes when no encoding is given (the default, byte-preserving
/// path).
pub fn decode_name(raw: &[u8], encoding: Option<&'static Encoding>) -> String {
    match encoding {
        Some(enc) => enc.decode(raw).0.into_owned(),
        None => String::from_utf8_lossy(raw).into_owned(),
    }
}

/// Encode a filename into bytes for the archive's name field using
/// `encoding`, or as raw UTF-8 bytes when no encoding is given.
pub fn encode_name(name: &str, encoding: Option<&'static Encoding>) -> Vec<u8> {
    match encoding {
        Some(enc) => enc.encode(name).0.into_owned(),
        None => name.as_bytes().to_vec(),
    }
}
