//! In-memory, write-once virtual filesystem.
//!
//! # Responsibilities
//! - Stand in for the appliance's certificate/key storage area and upload area
//! - Store immutable byte blobs keyed by canonical path
//! - Refuse overwrites: every write is permanent for the process lifetime
//!
//! # Design Decisions
//! - One canonicalization rule ([`canonicalize`]) is applied by `exists`, `read_file`
//!   and `write_file`, so `./a//b`, `a/b` and `/a/b` are the same entry
//! - Paths are always rooted; `..` never climbs above `/`
//! - The check-then-insert of `write_file` goes through the `DashMap` entry API,
//!   which holds the shard lock across both steps

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::observability::metrics;

/// Namespace holding installed certificates.
pub const CERTS_ROOT: &str = "/certs";
/// Namespace holding installed private keys.
pub const KEYS_ROOT: &str = "/keys";
/// Destination root of raw uploads.
pub const UPLOAD_ROOT: &str = "/var/config/rest/downloads";

/// Errors returned by the virtual filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    #[error("file does not exist")]
    NotFound(String),

    #[error("file already exists")]
    AlreadyExists(String),
}

/// Write-once blob store.
#[derive(Debug, Default)]
pub struct VirtualFilesystem {
    files: DashMap<String, Arc<[u8]>>,
}

impl VirtualFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `path` holds content.
    pub fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&canonicalize(path))
    }

    /// Read the full content stored at `path`.
    pub fn read_file(&self, path: &str) -> Result<Arc<[u8]>, VfsError> {
        let path = canonicalize(path);
        self.files
            .get(&path)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(VfsError::NotFound(path))
    }

    /// Store `content` at `path`, returning the number of bytes written.
    ///
    /// Fails with [`VfsError::AlreadyExists`] if the path is occupied; the
    /// existing content is left untouched.
    pub fn write_file(&self, path: &str, content: impl Into<Arc<[u8]>>) -> Result<usize, VfsError> {
        let path = canonicalize(path);
        match self.files.entry(path) {
            Entry::Occupied(entry) => Err(VfsError::AlreadyExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                let content = content.into();
                let written = content.len();
                tracing::debug!(path = %entry.key(), bytes = written, "Writing file");
                metrics::record_file_written(namespace_of(entry.key()));
                entry.insert(content);
                Ok(written)
            }
        }
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Canonical form of a virtual path.
///
/// Collapses redundant separators and `.` segments, resolves `..` against the
/// preceding segment and roots the result at `/`.
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Canonical path of `relative` resolved inside `root`.
pub fn join(root: &str, relative: &str) -> String {
    canonicalize(&format!("{}/{}", root, relative))
}

/// Whether the canonical form of `path` lies strictly inside `root`.
pub fn is_within(root: &str, path: &str) -> bool {
    let root = canonicalize(root);
    let path = canonicalize(path);
    path.len() > root.len() && path.starts_with(&root) && path.as_bytes()[root.len()] == b'/'
}

fn namespace_of(path: &str) -> &'static str {
    if is_within(CERTS_ROOT, path) {
        "certs"
    } else if is_within(KEYS_ROOT, path) {
        "keys"
    } else if is_within(UPLOAD_ROOT, path) {
        "uploads"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("./a//b"), "/a/b");
        assert_eq!(canonicalize("a/b"), "/a/b");
        assert_eq!(canonicalize("/a/./b/../c/"), "/a/c");
        assert_eq!(canonicalize("/../../etc"), "/etc");
        assert_eq!(canonicalize(""), "/");
    }

    #[test]
    fn test_write_then_read() {
        let fs = VirtualFilesystem::new();
        assert_eq!(fs.write_file("/certs/a.crt", b"hello".to_vec()).unwrap(), 5);
        assert_eq!(&*fs.read_file("/certs/a.crt").unwrap(), b"hello");
        assert!(fs.exists("certs/a.crt"));
    }

    #[test]
    fn test_write_once() {
        let fs = VirtualFilesystem::new();
        fs.write_file("/keys/k", b"first".to_vec()).unwrap();

        let err = fs.write_file("keys/./k", b"second".to_vec()).unwrap_err();
        assert_eq!(err, VfsError::AlreadyExists("/keys/k".to_string()));
        assert_eq!(&*fs.read_file("/keys/k").unwrap(), b"first");
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_equivalent_spellings_share_entry() {
        let fs = VirtualFilesystem::new();
        fs.write_file("./a//b", b"x".to_vec()).unwrap();
        assert!(fs.exists("a/b"));
        assert!(fs.exists("/a/c/../b"));
        assert!(fs.write_file("a/b", b"y".to_vec()).is_err());
    }

    #[test]
    fn test_read_missing() {
        let fs = VirtualFilesystem::new();
        assert_eq!(
            fs.read_file("/certs/none").unwrap_err(),
            VfsError::NotFound("/certs/none".to_string())
        );
        assert!(!fs.exists("/certs/none"));
    }

    #[test]
    fn test_join_and_containment() {
        assert_eq!(join(CERTS_ROOT, "Common/c1.crt"), "/certs/Common/c1.crt");
        assert_eq!(join(CERTS_ROOT, "/c1.crt"), "/certs/c1.crt");
        assert!(is_within(UPLOAD_ROOT, &join(UPLOAD_ROOT, "bundle.pem")));
        assert!(!is_within(UPLOAD_ROOT, &join(UPLOAD_ROOT, "../../secret")));
        assert!(!is_within(UPLOAD_ROOT, UPLOAD_ROOT));
        assert!(!is_within("/certs", "/certsx/a"));
    }
}
