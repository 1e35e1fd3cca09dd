//! The most recent archive per session, kept on disk for `GET /download`.

use crate::error::PackagingError;
use dtab_kernel::session_key::SessionKey;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// `<dir>/<key>.zip`
#[must_use]
pub fn archive_path(dir: &Path, key: &SessionKey) -> PathBuf {
    dir.join(format!("{key}.zip"))
}

/// Replaces the latest archive of `key` in `dir`. Readers see the old or the new file,
/// never a partial one. Concurrent writers each stage their own temp file.
///
/// # Errors
/// Returns [`PackagingError::Io`] when the directory or file cannot be written.
pub async fn write_latest(dir: &Path, key: &SessionKey, bytes: &[u8]) -> Result<(), PackagingError> {
    let io_error = |source, action: &str| PackagingError::Io {
        source,
        context: Some(format!("{action} {}", dir.display()).into()),
    };

    tokio::fs::create_dir_all(dir).await.map_err(|e| io_error(e, "creating"))?;

    let target = archive_path(dir, key);
    let tmp = dir.join(format!("{key}.{}.zip.tmp", Uuid::new_v4().simple()));
    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error(e, "writing archive in"));
    }
    if let Err(e) = tokio::fs::rename(&tmp, &target).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_error(e, "replacing archive in"));
    }

    tracing::debug!(session = %key, path = %target.display(), bytes = bytes.len(), "Latest archive saved");
    Ok(())
}

/// # Errors
/// Returns [`PackagingError::Io`] for read failures other than a missing file.
pub async fn read_latest(dir: &Path, key: &SessionKey) -> Result<Option<Vec<u8>>, PackagingError> {
    let path = archive_path(dir, key);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PackagingError::Io {
            source,
            context: Some(format!("reading {}", path.display()).into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> SessionKey {
        SessionKey::parse(raw).unwrap()
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|entry| entry.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[tokio::test]
    async fn latest_archive_is_replaced() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("nested/output");
        let tab = key("tab-1");

        assert_eq!(read_latest(&out, &tab).await.unwrap(), None);

        write_latest(&out, &tab, b"first").await.unwrap();
        write_latest(&out, &tab, b"second").await.unwrap();

        assert_eq!(read_latest(&out, &tab).await.unwrap().as_deref(), Some(&b"second"[..]));
        assert!(out.join("tab-1.zip").exists());
        assert_eq!(leftover_temp_files(&out), 0);
    }

    #[tokio::test]
    async fn sessions_keep_separate_archives() {
        let dir = tempfile::TempDir::new().unwrap();

        write_latest(dir.path(), &key("a"), b"from a").await.unwrap();

        assert_eq!(read_latest(dir.path(), &key("a")).await.unwrap().as_deref(), Some(&b"from a"[..]));
        assert_eq!(read_latest(dir.path(), &key("b")).await.unwrap(), None);

        write_latest(dir.path(), &key("b"), b"from b").await.unwrap();
        assert_eq!(read_latest(dir.path(), &key("a")).await.unwrap().as_deref(), Some(&b"from a"[..]));
        assert_eq!(read_latest(dir.path(), &key("b")).await.unwrap().as_deref(), Some(&b"from b"[..]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_all_succeed() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().to_path_buf();
        let payloads: Vec<Vec<u8>> = (0..8).map(|i| format!("archive-{i}").repeat(512).into_bytes()).collect();

        let tasks: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|bytes| {
                let out = out.clone();
                tokio::spawn(async move { write_latest(&out, &key("shared"), &bytes).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let last = read_latest(&out, &key("shared")).await.unwrap().unwrap();
        assert!(payloads.contains(&last));
        assert_eq!(leftover_temp_files(&out), 0);
    }
}
