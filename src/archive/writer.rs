//! Pack a directory tree into a `.pac` archive.
//!
//! Mirrors the original's `CreatePackageMT`: enumerate files, fan out
//! read+compress across a bounded worker pool, then commit results to the
//! index in spawn order so `position` stays monotonic.

use crate::archive::{obfuscate, MAGIC};
use crate::codepage;
use crate::compression::{self, is_opt_out, Method};
use crate::entry::PackageEntry;
use crate::error::PacError;
use crate::huffman;
use crate::walker::walk_files;
use crate::workers::{default_worker_count, run_write_pool, PackedFile};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub struct PackSummary {
    pub entries_written: u32,
    pub entries_skipped: u32,
    pub elapsed: Duration,
}

/// Pack every regular file under `source_dir` into `archive_path` using
/// `method`. `workers` of `0` selects [`default_worker_count`]. `codepage`
/// transcodes each entry's name into the archive's name field; `None`
/// preserves the path's raw UTF-8 bytes, which is the default.
pub fn pack(
    source_dir: &Path,
    archive_path: &Path,
    method: Method,
    workers: usize,
    codepage: Option<&'static Encoding>,
) -> Result<PackSummary, PacError> {
    let started = Instant::now();
    let paths = walk_files(source_dir, Some(archive_path)).map_err(PacError::IoRead)?;
    let worker_count = if workers == 0 { default_worker_count() } else { workers };

    let items: Vec<(std::path::PathBuf, String)> = paths
        .into_iter()
        .map(|p| {
            let name = p.strip_prefix(source_dir).unwrap_or(&p).to_string_lossy().replace('\\', "/");
            (p, name)
        })
        .collect();

    let results = run_write_pool(&items, worker_count, |(path, name)| read_and_compress(path, name, method));

    let mut file = File::create(archive_path).map_err(PacError::IoOpen)?;
    file.write_all(&MAGIC).map_err(PacError::IoWrite)?;
    file.write_all(&0u32.to_le_bytes()).map_err(PacError::IoWrite)?; // placeholder entry_count
    file.write_all(&method.code().to_le_bytes()).map_err(PacError::IoWrite)?;

    let mut entries: Vec<PackageEntry> = Vec::new();
    let mut offset: u32 = crate::archive::HEADER_LEN as u32;
    let mut skipped = 0u32;

    for result in results {
        let Some(packed) = result else {
            skipped += 1;
            continue;
        };
        let name_bytes = codepage::encode_name(&packed.name, codepage);
        match PackageEntry::new(&name_bytes, offset, packed.original_size, packed.compressed_size) {
            Ok(entry) => {
                file.write_all(&packed.blob).map_err(PacError::IoWrite)?;
                offset += packed.blob.len() as u32;
                entries.push(entry);
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", packed.name);
                skipped += 1;
            }
        }
    }

    let mut index_bytes = Vec::with_capacity(entries.len() * crate::entry::ENTRY_SIZE);
    for e in &entries {
        index_bytes.extend_from_slice(&e.to_bytes());
    }
    let mut obf_index = huffman::encode(&index_bytes);
    obfuscate(&mut obf_index);
    file.write_all(&obf_index).map_err(PacError::IoWrite)?;
    file.write_all(&(obf_index.len() as u32).to_le_bytes()).map_err(PacError::IoWrite)?;

    file.seek(SeekFrom::Start(4)).map_err(PacError::IoWrite)?;
    file.write_all(&(entries.len() as u32).to_le_bytes()).map_err(PacError::IoWrite)?;
    file.flush().map_err(PacError::IoWrite)?;

    Ok(PackSummary { entries_written: entries.len() as u32, entries_skipped: skipped, elapsed: started.elapsed() })
}

/// Read one file and compress it, applying the extension opt-out. Returns
/// `None` (after logging) on any I/O or compression failure; per-file
/// failures are absorbed, not propagated.
fn read_and_compress(path: &Path, name: &str, method: Method) -> Option<PackedFile> {
    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("failed to read {}: {e}", path.display());
            return None;
        }
    };
    let effective_method = if is_opt_out(name) { Method::Store } else { method };
    let blob = match compression::compress(effective_method, &data) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("failed to compress {}: {e}", path.display());
            return None;
        }
    };
    Some(PackedFile {
        name: name.to_string(),
        original_size: data.len() as u32,
        compressed_size: blob.len() as u32,
        blob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn pack_writes_expected_header() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("a.txt"), b"hello").unwrap();
        fs::write(src.path().join("b.txt"), b"world").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let summary = pack(src.path(), out.path(), Method::Store, 1, None).unwrap();
        assert_eq!(summary.entries_written, 2);
        assert_eq!(summary.entries_skipped, 0);

        let bytes = fs::read(out.path()).unwrap();
        assert_eq!(&bytes[0..4], &MAGIC);
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 0);
    }

    #[test]
    fn skips_overlong_names() {
        let src = tempfile::tempdir().unwrap();
        let long_name = "x".repeat(64);
        fs::write(src.path().join(&long_name), b"data").unwrap();
        fs::write(src.path().join("ok.txt"), b"data").unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let summary = pack(src.path(), out.path(), Method::Store, 2, None).unwrap();
        assert_eq!(summary.entries_written, 1);
        assert_eq!(summary.entries_skipped, 1);
    }
}
