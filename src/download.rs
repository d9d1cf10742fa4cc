//! Download functionality for saving the assembled audiobook archive.
//!
//! The backend bundles every scraped audio file into one zip behind a
//! fixed endpoint; this module names the archive after the resolved title
//! and writes it into the download directory.

use crate::error::Result;
use crate::types::ReadyDownload;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the full output path for the archive.
///
/// # Arguments
///
/// * `download_dir` - The download directory
/// * `ready` - The download-ready book whose title names the archive
pub fn get_archive_path(download_dir: &Path, ready: &ReadyDownload) -> PathBuf {
    download_dir.join(ready.archive_filename())
}

/// Write the fetched archive bytes to disk.
///
/// Returns the path the archive was saved under.
pub fn save_archive(download_dir: &Path, ready: &ReadyDownload, bytes: &[u8]) -> Result<PathBuf> {
    let path = get_archive_path(download_dir, ready);
    fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{resolve_title, AudioManifest};

    fn ready(title: &str) -> ReadyDownload {
        ReadyDownload {
            manifest: AudioManifest::new(),
            title: resolve_title(title),
        }
    }

    #[test]
    fn test_get_archive_path() {
        let path = get_archive_path(Path::new("/downloads"), &ready("Dune  Abridged"));
        assert_eq!(path, PathBuf::from("/downloads/Dune_Abridged_audiobook.zip"));
    }

    #[test]
    fn test_get_archive_path_plain_title() {
        let path = get_archive_path(Path::new("."), &ready("Hobbit"));
        assert_eq!(path, PathBuf::from("./Hobbit_audiobook.zip"));
    }

    #[test]
    fn test_save_archive_writes_bytes() {
        let dir = std::env::temp_dir().join("audiobook-fetcher-test-save");
        fs::create_dir_all(&dir).unwrap();

        let path = save_archive(&dir, &ready("The Great Gatsby"), b"zip bytes").unwrap();
        assert!(path.ends_with("The_Great_Gatsby_audiobook.zip"));
        assert_eq!(fs::read(&path).unwrap(), b"zip bytes");

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir(&dir);
    }
}
