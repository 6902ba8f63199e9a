//! Uniform interface over the archive's payload compression methods.

use crate::error::PacError;
use std::io::{Read, Write};

/// Extensions that are always stored uncompressed, regardless of the
/// archive's chosen method. These formats are already compressed and
/// gain nothing (and sometimes lose a little) from a second pass.
const OPT_OUT_EXTENSIONS: &[&str] = &[".ogg", ".png", ".wav", ".fnt"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Store,
    Zlib,
    Zstd,
}

impl Method {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Method::Store),
            4 => Some(Method::Zlib),
            7 => Some(Method::Zstd),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Method::Store => 0,
            Method::Zlib => 4,
            Method::Zstd => 7,
        }
    }
}

impl std::str::FromStr for Method {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no" | "store" => Ok(Method::Store),
            "zlib" => Ok(Method::Zlib),
            "zstd" => Ok(Method::Zstd),
            other => Err(format!("unknown compression method `{other}`")),
        }
    }
}

/// True if `name`'s extension forces store-mode regardless of `method`.
pub fn is_opt_out(name: &str) -> bool {
    match name.rfind('.') {
        Some(i) => OPT_OUT_EXTENSIONS.contains(&&name[i..]),
        None => false,
    }
}

/// Compress `src` under `method`, using zlib's best compression level.
/// This crate's only write path goes through the worker pool, which has
/// always used level 9 rather than the library default.
pub fn compress(method: Method, src: &[u8]) -> Result<Vec<u8>, PacError> {
    match method {
        Method::Store => Ok(src.to_vec()),
        Method::Zlib => {
            let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
            encoder.write_all(src).map_err(|_| PacError::CompressFailed)?;
            encoder.finish().map_err(|_| PacError::CompressFailed)
        }
        Method::Zstd => zstd::stream::encode_all(src, zstd::zstd_safe::max_c_level()).map_err(|_| PacError::CompressFailed),
    }
}

/// Decompress `src`, which is known to expand to exactly `original_size`
/// bytes.
pub fn decompress(method: Method, src: &[u8], original_size: usize) -> Result<Vec<u8>, PacError> {
    match method {
        Method::Store => Ok(src.to_vec()),
        Method::Zlib => {
            let mut decoder = flate2::read::ZlibDecoder::new(src);
            let mut out = Vec::with_capacity(original_size);
            decoder.read_to_end(&mut out).map_err(|_| PacError::DecompressFailed)?;
            Ok(out)
        }
        Method::Zstd => zstd::stream::decode_all(src).map_err(|_| PacError::DecompressFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_round_trip() {
        let data = b"hello world".to_vec();
        let c = compress(Method::Store, &data).unwrap();
        let d = decompress(Method::Store, &c, data.len()).unwrap();
        assert_eq!(d, data);
    }

    #[test]
    fn zlib_round_trip() {
        let data = vec![b'x'; 10_000];
        let c = compress(Method::Zlib, &data).unwrap();
        assert!(c.len() < data.len());
        let d = decompress(Method::Zlib, &c, data.len()).unwrap();
        assert_eq!(d, data);
    }

    #[test]
    fn zstd_round_trip() {
        let data = vec![0u8; 1024 * 1024];
        let c = compress(Method::Zstd, &data).unwrap();
        assert!(c.len() < data.len());
        let d = decompress(Method::Zstd, &c, data.len()).unwrap();
        assert_eq!(d, data);
    }

    #[test]
    fn opt_out_extensions() {
        assert!(is_opt_out("music.ogg"));
        assert!(is_opt_out("sprite.PNG") == false);
        assert!(!is_opt_out("data.bin"));
        assert!(!is_opt_out("no_extension"));
    }

    #[test]
    fn method_from_str() {
        assert_eq!("no".parse::<Method>().unwrap(), Method::Store);
        assert_eq!("zlib".parse::<Method>().unwrap(), Method::Zlib);
        assert_eq!("zstd".parse::<Method>().unwrap(), Method::Zstd);
        assert!("bogus".parse::<Method>().is_err());
    }
}
