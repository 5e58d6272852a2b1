//! Resource resolution module
//!
//! Maps a request path plus the configured root and index-file list to a
//! concrete file on disk, capturing the metadata snapshot the rest of the
//! pipeline works from.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::fs;

/// Resolution failure
///
/// Every failure path collapses to `NotFound`: callers never learn whether
/// the path was missing, unreadable, or some special file. This keeps
/// filesystem detail out of client-visible responses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("file not found")]
    NotFound,
}

/// A resolved, servable file
///
/// Created once per request, immutable afterwards. The validator is derived
/// from `(inode, size, modified)` and changes exactly when any of them does.
#[derive(Debug, Clone)]
pub struct Resource {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub inode: u64,
    pub validator: String,
}

impl Resource {
    fn from_metadata(path: PathBuf, meta: &std::fs::Metadata) -> Self {
        let size = meta.len();
        let modified = meta.modified().unwrap_or(UNIX_EPOCH);
        let inode = inode_of(meta);
        let validator = validator_token(inode, size, modified);
        Self {
            path,
            size,
            modified,
            inode,
            validator,
        }
    }
}

/// Resolve a request path against the serve root
///
/// A regular file is served directly. A directory is probed with each index
/// name in order and the first regular file wins; with an empty index list a
/// directory is immediately `NotFound` (no listing). Anything else fails.
pub async fn resolve(
    root: &Path,
    index_files: &[String],
    path: &str,
) -> Result<Resource, ResolveError> {
    let candidate = root.join(path.trim_start_matches('/'));
    let meta = fs::metadata(&candidate)
        .await
        .map_err(|_| ResolveError::NotFound)?;

    if meta.is_file() {
        return Ok(Resource::from_metadata(candidate, &meta));
    }

    if meta.is_dir() {
        for name in index_files {
            let probe = candidate.join(name);
            // metadata follows symlinks, so a link to a directory is skipped here
            if let Ok(probe_meta) = fs::metadata(&probe).await {
                if probe_meta.is_file() {
                    return Ok(Resource::from_metadata(probe, &probe_meta));
                }
            }
        }
    }

    Err(ResolveError::NotFound)
}

/// Derive the opaque freshness validator from the metadata snapshot
pub fn validator_token(inode: u64, size: u64, modified: SystemTime) -> String {
    let millis = modified
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("\"{inode:x}-{size:x}-{millis:x}\"")
}

#[cfg(unix)]
fn inode_of(meta: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.ino()
}

#[cfg(not(unix))]
fn inode_of(_meta: &std::fs::Metadata) -> u64 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn index_names() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[tokio::test]
    async fn test_resolves_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        let resource = resolve(dir.path(), &index_names(), "/a.txt").await.unwrap();
        assert_eq!(resource.size, 5);
        assert!(resource.validator.starts_with('"'));
        assert!(resource.validator.ends_with('"'));
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(dir.path(), &index_names(), "/nope.txt")
            .await
            .unwrap_err();
        assert_eq!(err, ResolveError::NotFound);
    }

    #[tokio::test]
    async fn test_directory_probes_index_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.htm"), b"second").unwrap();
        std::fs::write(dir.path().join("index.html"), b"first!").unwrap();

        let resource = resolve(dir.path(), &index_names(), "/").await.unwrap();
        assert!(resource.path.ends_with("index.html"));
        assert_eq!(resource.size, 6);
    }

    #[tokio::test]
    async fn test_index_name_that_is_a_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("index.html")).unwrap();
        std::fs::write(dir.path().join("index.htm"), b"fallback").unwrap();

        let resource = resolve(dir.path(), &index_names(), "/").await.unwrap();
        assert!(resource.path.ends_with("index.htm"));
    }

    #[tokio::test]
    async fn test_directory_without_index_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(dir.path(), &index_names(), "/").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound);
    }

    #[tokio::test]
    async fn test_empty_index_list_fails_immediately() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"ignored").unwrap();

        let err = resolve(dir.path(), &[], "/").await.unwrap_err();
        assert_eq!(err, ResolveError::NotFound);
    }

    #[test]
    fn test_validator_deterministic() {
        let t = UNIX_EPOCH + Duration::from_millis(1_472_121_196_500);
        assert_eq!(validator_token(7, 10, t), validator_token(7, 10, t));
    }

    #[test]
    fn test_validator_changes_with_each_input() {
        let t = UNIX_EPOCH + Duration::from_millis(1_472_121_196_500);
        let base = validator_token(7, 10, t);
        assert_ne!(base, validator_token(8, 10, t));
        assert_ne!(base, validator_token(7, 11, t));
        assert_ne!(base, validator_token(7, 10, t + Duration::from_millis(1)));
    }
}
