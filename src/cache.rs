use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    definitions::RawPage,
    wikitext::{Result, WtError},
};

/// Every regular file under `dir`, recursively, in sorted order.
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current)
            .map_err(|e| WtError::io_err(format!("Failed to read {:?}", current), e))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Page id from a cached file name (`id1234.wiki` -> `id1234`).
fn page_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Read every cached page export under `dir`.
///
/// The directory itself must be readable; single files that cannot be read
/// (e.g. not UTF-8) are logged and skipped.
pub fn read_pages(dir: &Path) -> Result<Vec<RawPage>> {
    let mut pages = Vec::new();
    for path in collect_files(dir)? {
        match fs::read_to_string(&path) {
            Ok(text) => pages.push(RawPage::new(page_id(&path), text)),
            Err(e) => log::warn!("Failed to read cached page {:?}: {}", path, e),
        }
    }
    log::info!("Read {} cached pages from {:?}", pages.len(), dir);
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("id2.wiki"), "<title>B</title>").unwrap();
        fs::write(dir.path().join("id1.wiki"), "<title>A</title>").unwrap();
        fs::create_dir(dir.path().join("more")).unwrap();
        fs::write(dir.path().join("more").join("id3.wiki"), "<title>C</title>").unwrap();
        fs::write(dir.path().join("broken.wiki"), vec![0xffu8, 0xfe, 0x00]).unwrap();

        let pages = read_pages(dir.path()).unwrap();
        let ids: Vec<_> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["id1", "id2", "id3"]);
        assert_eq!(pages[2].title().unwrap(), "C");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_pages(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), "Io");
    }
}
