//! File system utilities for the pipeline.
//!
//! Backups are always written and flushed to disk before the original file is
//! touched; callers rely on [`write_backup`] returning only after `fsync`.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Sibling backup path: `<file>.backup`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".backup");
    PathBuf::from(name)
}

/// Writes `contents` to `path` and flushes it to stable storage.
pub async fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

/// Writes `original` to the sibling backup of `path` and returns the backup path.
pub async fn write_backup(path: &Path, original: &[u8]) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    write_synced(&backup, original).await?;
    log::debug!("Backed up {} to {}", path.display(), backup.display());
    Ok(backup)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> io::Result<()> {
    if fs::try_exists(path).await? {
        fs::remove_dir_all(path).await
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/srv/docker-compose.yml")),
            PathBuf::from("/srv/docker-compose.yml.backup")
        );
    }

    #[tokio::test]
    async fn test_write_backup_copies_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let original = tmp.path().join("Dockerfile");
        let backup = write_backup(&original, b"FROM ruby\n").await.unwrap();
        assert_eq!(std::fs::read(backup).unwrap(), b"FROM ruby\n");
        assert!(!original.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_dir_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(remove_dir_all(&tmp.path().join("gone")).await.is_ok());
    }
}
