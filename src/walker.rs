//! Enumerate regular files under a directory root.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Returns every regular file under `root`, sorted by path so repeated
/// packs of an unchanged tree are byte-identical modulo timing. Symlinks
/// are not followed. `exclude`, when given, names a path to leave out of
/// the results even if it lives under `root`, so packing a directory that
/// contains the archive being written doesn't fold the archive into
/// itself.
pub fn walk_files(root: &Path, exclude: Option<&Path>) -> std::io::Result<Vec<PathBuf>> {
    let exclude = exclude.and_then(|p| p.canonicalize().ok());
    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if let Some(skip) = &exclude {
            if path.canonicalize().ok().as_ref() == Some(skip) {
                continue;
            }
        }
        out.push(path);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walks_nested_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("sub/a.txt"), b"a").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let files = walk_files(dir.path(), None).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub/a.txt"]);
    }

    #[test]
    fn skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty_dir")).unwrap();
        let files = walk_files(dir.path(), None).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn excludes_archive_output_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let archive = dir.path().join("out.pac");
        fs::write(&archive, b"placeholder").unwrap();

        let files = walk_files(dir.path(), Some(&archive)).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.txt"]);
    }
}
