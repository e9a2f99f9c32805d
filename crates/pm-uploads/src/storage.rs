//! File storage backends
//!
//! Uploaded files are written through [`FileStore`]; the public URL it hands
//! back is what document records point at.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

const MAX_FILENAME_LEN: usize = 100;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// What a backend reports after writing a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub key: String,
    pub size: u64,
    pub content_type: String,
    /// SHA-256, hex encoded
    pub digest: String,
}

impl StoredFile {
    fn describe(key: &str, data: &[u8]) -> Self {
        Self {
            key: key.to_string(),
            size: data.len() as u64,
            content_type: content_type_for(key),
            digest: sha256_hex(data),
        }
    }
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<StoredFile>;

    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Removing a missing key is not an error
    async fn delete(&self, key: &str) -> StorageResult<()>;

    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL under which `key` is served
    fn url(&self, key: &str) -> String;

    fn name(&self) -> &'static str;
}

/// Files on the local filesystem, served from `base_url`
pub struct LocalStore {
    root: PathBuf,
    base_url: String,
}

impl LocalStore {
    pub fn new(root: impl AsRef<Path>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, key: &str) -> StorageResult<PathBuf> {
        let traverses = key
            .split(['/', '\\'])
            .any(|segment| segment == ".." || segment == ".");
        if key.is_empty() || traverses || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl FileStore for LocalStore {
    #[instrument(skip(self, data), fields(storage = "local"))]
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<StoredFile> {
        let path = self.resolve_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;

        debug!(path = ?path, size = data.len(), "File stored");
        Ok(StoredFile::describe(key, &data))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.resolve_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), fields(storage = "local"))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = ?path, "File deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// In-memory store for tests and local development
pub struct MemoryStore {
    files: RwLock<HashMap<String, Bytes>>,
    base_url: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("/uploads")
    }
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            base_url: base_url.into(),
        }
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn put(&self, key: &str, data: Bytes) -> StorageResult<StoredFile> {
        let stored = StoredFile::describe(key, &data);
        self.files.write().await.insert(key.to_string(), data);
        Ok(stored)
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.files
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.files.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.files.read().await.contains_key(key))
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Storage key for an uploaded file: `<uuid>/<sanitised filename>`
pub fn generate_key(filename: &str) -> String {
    format!("{}/{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Reduce a client-supplied filename to a safe single path segment
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "file".to_string();
    }

    // Keep the extension when shortening
    if cleaned.len() > MAX_FILENAME_LEN {
        let ext = Path::new(cleaned)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.len() < 16)
            .unwrap_or("");
        let keep = MAX_FILENAME_LEN - ext.len() - usize::from(!ext.is_empty());
        let mut shortened = cleaned[..keep].to_string();
        if !ext.is_empty() {
            shortened.push('.');
            shortened.push_str(ext);
        }
        return shortened;
    }

    cleaned.to_string()
}

/// MIME type served for a stored key, from its extension
pub fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key).first_or_octet_stream().to_string()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalStore {
        let dir = std::env::temp_dir().join(format!("pm-uploads-{}", Uuid::new_v4()));
        LocalStore::new(dir, "/uploads/")
    }

    #[tokio::test]
    async fn test_memory_store_put_get_delete() {
        let store = MemoryStore::default();
        let data = Bytes::from_static(b"%PDF-1.7");

        let stored = store.put("abc/lease.pdf", data.clone()).await.unwrap();
        assert_eq!(stored.size, 8);
        assert_eq!(stored.content_type, "application/pdf");
        assert_eq!(store.get("abc/lease.pdf").await.unwrap(), data);

        store.delete("abc/lease.pdf").await.unwrap();
        assert!(!store.exists("abc/lease.pdf").await.unwrap());
        assert!(matches!(
            store.get("abc/lease.pdf").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let store = temp_store();
        let data = Bytes::from_static(b"\x89PNG");

        store.put("k1/photo.png", data.clone()).await.unwrap();
        assert!(store.exists("k1/photo.png").await.unwrap());
        assert_eq!(store.get("k1/photo.png").await.unwrap(), data);

        store.delete("k1/photo.png").await.unwrap();
        store.delete("k1/photo.png").await.unwrap();
        assert!(!store.exists("k1/photo.png").await.unwrap());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn test_local_store_rejects_path_traversal() {
        let store = temp_store();
        for key in ["../../etc/passwd", "/etc/passwd", "a/../../b", "", "a\\..\\b"] {
            assert!(
                matches!(store.get(key).await, Err(StorageError::InvalidPath(_))),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_url_joins_base() {
        let store = LocalStore::new("/tmp", "https://cdn.example.com/files/");
        assert_eq!(store.url("k/a.pdf"), "https://cdn.example.com/files/k/a.pdf");
        assert_eq!(MemoryStore::default().url("k/a.pdf"), "/uploads/k/a.pdf");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Lease 2024 (signed).pdf"), "Lease_2024__signed_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.png"), "scan.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("..."), "file");

        let long = format!("{}.pdf", "a".repeat(300));
        let short = sanitize_filename(&long);
        assert_eq!(short.len(), MAX_FILENAME_LEN);
        assert!(short.ends_with(".pdf"));
    }

    #[test]
    fn test_generate_key() {
        let key = generate_key("my lease.pdf");
        let (prefix, name) = key.split_once('/').unwrap();
        assert!(Uuid::parse_str(prefix).is_ok());
        assert_eq!(name, "my_lease.pdf");
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
