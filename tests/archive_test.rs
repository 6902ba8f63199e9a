use pactool::archive::{reader, writer};
use pactool::compression::Method;
use std::fs;

type STDRESULT = Result<(), Box<dyn std::error::Error>>;

#[test]
fn s1_store_header_and_round_trip() -> STDRESULT {
    let src = tempfile::tempdir()?;
    fs::write(src.path().join("a.txt"), b"hello")?;
    fs::write(src.path().join("b.txt"), b"world")?;
    let archive = tempfile::NamedTempFile::new()?;

    writer::pack(src.path(), archive.path(), Method::Store, 1, None)?;

    let bytes = fs::read(archive.path())?;
    assert_eq!(&bytes[0..4], &[0x50, 0x41, 0x43, 0x75]);
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 0);

    let dst = tempfile::tempdir()?;
    reader::unpack(archive.path(), dst.path(), 1, None)?;
    assert_eq!(fs::read(dst.path().join("a.txt"))?, b"hello");
    assert_eq!(fs::read(dst.path().join("b.txt"))?, b"world");
    Ok(())
}

#[test]
fn s3_zstd_large_zero_file() -> STDRESULT {
    let src = tempfile::tempdir()?;
    fs::write(src.path().join("big.bin"), vec![0u8; 1024 * 1024])?;
    let archive = tempfile::NamedTempFile::new()?;

    writer::pack(src.path(), archive.path(), Method::Zstd, 1, None)?;

    let dst = tempfile::tempdir()?;
    reader::unpack(archive.path(), dst.path(), 1, None)?;
    let restored = fs::read(dst.path().join("big.bin"))?;
    assert_eq!(restored.len(), 1024 * 1024);
    assert!(restored.iter().all(|&b| b == 0));
    Ok(())
}

#[test]
fn s4_opt_out_extension_stores_raw() -> STDRESULT {
    let src = tempfile::tempdir()?;
    let data = vec![0xABu8; 10 * 1024];
    fs::write(src.path().join("music.ogg"), &data)?;
    let archive = tempfile::NamedTempFile::new()?;

    writer::pack(src.path(), archive.path(), Method::Zlib, 1, None)?;

    let dst = tempfile::tempdir()?;
    reader::unpack(archive.path(), dst.path(), 1, None)?;
    assert_eq!(fs::read(dst.path().join("music.ogg"))?, data);
    Ok(())
}

#[test]
fn s6_overlong_name_is_dropped() -> STDRESULT {
    let src = tempfile::tempdir()?;
    fs::write(src.path().join("x".repeat(64)), b"data")?;
    fs::write(src.path().join("kept.txt"), b"data")?;
    let archive = tempfile::NamedTempFile::new()?;

    let summary = writer::pack(src.path(), archive.path(), Method::Store, 1, None)?;
    assert_eq!(summary.entries_written, 1);
    assert_eq!(summary.entries_skipped, 1);

    let bytes = fs::read(archive.path())?;
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 1);
    Ok(())
}

#[test]
fn worker_count_independent_extraction() -> STDRESULT {
    let src = tempfile::tempdir()?;
    for i in 0..12 {
        fs::write(src.path().join(format!("f{i}.txt")), format!("contents {i}"))?;
    }
    let archive = tempfile::NamedTempFile::new()?;
    writer::pack(src.path(), archive.path(), Method::Zlib, 3, None)?;

    let dst_one = tempfile::tempdir()?;
    let dst_many = tempfile::tempdir()?;
    reader::unpack(archive.path(), dst_one.path(), 1, None)?;
    reader::unpack(archive.path(), dst_many.path(), 8, None)?;

    for i in 0..12 {
        let name = format!("f{i}.txt");
        assert_eq!(fs::read(dst_one.path().join(&name))?, fs::read(dst_many.path().join(&name))?);
    }
    Ok(())
}
