//! Unpack a `.pac` archive into a mirror directory.
//!
//! Mirrors the original's `ExtractPackage`/`ExtractEntryMT`: parse the
//! header, pull the obfuscated index off the tail, Huffman-decode it, then
//! fan extraction out across contiguous slices with each worker opening
//! its own file handle.

use crate::archive::obfuscate;
use crate::codepage;
use crate::compression::{self, Method};
use crate::entry::{PackageEntry, ENTRY_SIZE};
use crate::error::PacError;
use crate::huffman;
use crate::workers::{default_worker_count, partition_ranges};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

pub struct UnpackSummary {
    pub entries_extracted: u32,
    pub entries_failed: u32,
    pub elapsed: Duration,
}

/// Extract every entry in `archive_path` into `target_dir`. `workers` of
/// `0` selects [`default_worker_count`]. `codepage` transcodes entry names
/// before they're used as output paths; `None` preserves the raw bytes.
pub fn unpack(
    archive_path: &Path,
    target_dir: &Path,
    workers: usize,
    codepage: Option<&'static Encoding>,
) -> Result<UnpackSummary, PacError> {
    let started = Instant::now();
    let mut file = File::open(archive_path).map_err(PacError::IoOpen)?;

    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).map_err(PacError::IoRead)?;
    // Only the first three bytes are checked; the fourth is ignored on
    // read (an intentional compatibility widening).
    if magic[0..3] != crate::archive::MAGIC[0..3] {
        return Err(PacError::BadMagic);
    }

    let mut header_rest = [0u8; 8];
    file.read_exact(&mut header_rest).map_err(PacError::IoRead)?;
    let entry_count = u32::from_le_bytes(header_rest[0..4].try_into().unwrap());
    let method_code = u32::from_le_bytes(header_rest[4..8].try_into().unwrap());
    let method = Method::from_code(method_code).ok_or(PacError::BadMagic)?;

    let file_len = file.metadata().map_err(PacError::IoRead)?.len();
    if file_len < 4 {
        return Err(PacError::IoRead(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "archive truncated")));
    }
    file.seek(SeekFrom::Start(file_len - 4)).map_err(PacError::IoRead)?;
    let mut size_buf = [0u8; 4];
    file.read_exact(&mut size_buf).map_err(PacError::IoRead)?;
    let obf_index_size = u32::from_le_bytes(size_buf) as u64;

    if file_len < 4 + obf_index_size {
        return Err(PacError::TreeMalformed);
    }
    file.seek(SeekFrom::Start(file_len - 4 - obf_index_size)).map_err(PacError::IoRead)?;
    let mut obf_index = vec![0u8; obf_index_size as usize];
    file.read_exact(&mut obf_index).map_err(PacError::IoRead)?;
    obfuscate(&mut obf_index);

    let index_bytes = huffman::decode(&obf_index, entry_count as usize * ENTRY_SIZE)?;
    let entries: Vec<PackageEntry> = index_bytes.chunks_exact(ENTRY_SIZE).map(PackageEntry::from_bytes).collect();

    std::fs::create_dir_all(target_dir).map_err(PacError::IoWrite)?;

    let worker_count = if workers == 0 { default_worker_count() } else { workers };
    let ranges = partition_ranges(entries.len(), worker_count);

    let extracted_counts: Vec<(u32, u32)> = thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .iter()
            .map(|&(start, end)| {
                let slice = &entries[start..end];
                scope.spawn(move || extract_slice(archive_path, target_dir, slice, method, codepage))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("worker thread panicked")).collect()
    });

    let (ok, failed) = extracted_counts.into_iter().fold((0u32, 0u32), |(a, b), (x, y)| (a + x, b + y));

    Ok(UnpackSummary { entries_extracted: ok, entries_failed: failed, elapsed: started.elapsed() })
}

/// Extract a contiguous slice of entries, opening its own handle on the
/// archive file (workers never share a `File`).
fn extract_slice(
    archive_path: &Path,
    target_dir: &Path,
    entries: &[PackageEntry],
    method: Method,
    codepage: Option<&'static Encoding>,
) -> (u32, u32) {
    let mut file = match File::open(archive_path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("worker failed to open {}: {e}", archive_path.display());
            return (0, entries.len() as u32);
        }
    };

    let mut ok = 0u32;
    let mut failed = 0u32;
    for entry in entries {
        match extract_one(&mut file, target_dir, entry, method, codepage) {
            Ok(()) => ok += 1,
            Err(e) => {
                log::warn!("failed to extract {}: {e}", codepage::decode_name(entry.name_bytes(), codepage));
                failed += 1;
            }
        }
    }
    (ok, failed)
}

fn extract_one(
    file: &mut File,
    target_dir: &Path,
    entry: &PackageEntry,
    method: Method,
    codepage: Option<&'static Encoding>,
) -> Result<(), PacError> {
    file.seek(SeekFrom::Start(entry.position as u64)).map_err(PacError::IoRead)?;
    let mut blob = vec![0u8; entry.compressed_size as usize];
    file.read_exact(&mut blob).map_err(PacError::IoRead)?;

    let data = if entry.original_size == entry.compressed_size {
        // Sizes equal means the entry opted out of compression; read raw
        // without invoking the decompressor even when method != store.
        blob
    } else {
        compression::decompress(method, &blob, entry.original_size as usize)?
    };

    let name = codepage::decode_name(entry.name_bytes(), codepage).replace('\\', "/");
    let out_path = target_dir.join(&name);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(PacError::IoWrite)?;
    }
    let mut out = File::create(&out_path).map_err(PacError::IoWrite)?;
    out.write_all(&data).map_err(PacError::IoWrite)?;
    Ok(())
}
