//! Upload service: policy check, then storage

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::policy::{FileKind, UploadError, UploadPolicy};
use crate::storage::{generate_key, FileStore, StorageError};

#[derive(Debug, Error)]
pub enum UploadServiceError {
    #[error(transparent)]
    Rejected(#[from] UploadError),
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// A file as received from the client
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl IncomingFile {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
    pub digest: String,
}

#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn FileStore>,
    policy: UploadPolicy,
}

impl UploadService {
    pub fn new(store: Arc<dyn FileStore>, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    /// Store a batch of files.
    ///
    /// The whole batch is checked before anything is written. If a write
    /// fails, files already stored by this call are removed again.
    #[instrument(skip(self, files), fields(count = files.len(), storage = self.store.name()))]
    pub async fn upload(
        &self,
        files: Vec<IncomingFile>,
    ) -> Result<Vec<UploadedFile>, UploadServiceError> {
        self.policy.check_count(files.len())?;
        let kinds = files
            .iter()
            .map(|f| {
                self.policy
                    .check_file(&f.filename, f.content_type.as_deref(), f.data.len() as u64)
            })
            .collect::<Result<Vec<FileKind>, _>>()?;

        let mut uploaded = Vec::with_capacity(files.len());
        for (file, kind) in files.into_iter().zip(kinds) {
            let key = generate_key(&file.filename);
            let stored = match self.store.put(&key, file.data).await {
                Ok(stored) => stored,
                Err(e) => {
                    self.rollback(&uploaded).await;
                    return Err(e.into());
                }
            };

            info!(key = %key, kind = ?kind, size = stored.size, "File uploaded");

            uploaded.push(UploadedFile {
                name: file.filename,
                url: self.store.url(&key),
                key,
                size: stored.size,
                content_type: stored.content_type,
                digest: stored.digest,
            });
        }

        Ok(uploaded)
    }

    async fn rollback(&self, uploaded: &[UploadedFile]) {
        for file in uploaded {
            if let Err(e) = self.store.delete(&file.key).await {
                warn!(key = %file.key, error = %e, "Failed to remove partial upload");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service() -> (Arc<MemoryStore>, UploadService) {
        let store = Arc::new(MemoryStore::default());
        let service = UploadService::new(store.clone(), UploadPolicy::default());
        (store, service)
    }

    fn pdf(name: &str) -> IncomingFile {
        IncomingFile::new(name, Some("application/pdf".into()), Bytes::from_static(b"%PDF"))
    }

    #[tokio::test]
    async fn test_upload_returns_public_urls() {
        let (store, service) = service();
        let uploaded = service
            .upload(vec![pdf("lease.pdf"), pdf("id scan.pdf")])
            .await
            .unwrap();

        assert_eq!(uploaded.len(), 2);
        assert!(uploaded[0].url.starts_with("/uploads/"));
        assert!(uploaded[0].url.ends_with("/lease.pdf"));
        assert!(uploaded[1].url.ends_with("/id_scan.pdf"));
        assert_eq!(uploaded[0].content_type, "application/pdf");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_batch_is_rejected_before_anything_is_stored() {
        let (store, service) = service();
        let bad = IncomingFile::new("run.sh", Some("text/x-sh".into()), Bytes::from_static(b"#!"));

        let result = service.upload(vec![pdf("lease.pdf"), bad]).await;
        assert!(matches!(
            result,
            Err(UploadServiceError::Rejected(UploadError::UnsupportedType { .. }))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_disguised_markup_is_not_stored() {
        let (store, service) = service();
        let html = IncomingFile::new(
            "evil.html",
            Some("image/png".into()),
            Bytes::from_static(b"<script>alert(1)</script>"),
        );
        let svg = IncomingFile::new(
            "logo.svg",
            Some("image/svg+xml".into()),
            Bytes::from_static(b"<svg onload=\"alert(1)\"/>"),
        );

        for file in [html, svg] {
            assert!(matches!(
                service.upload(vec![file]).await,
                Err(UploadServiceError::Rejected(UploadError::UnsupportedType { .. }))
            ));
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_content_type_comes_from_extension() {
        let (_, service) = service();
        let photo = IncomingFile::new(
            "photo.jpg",
            Some("application/octet-stream".into()),
            Bytes::from_static(b"\xff\xd8\xff"),
        );

        let uploaded = service.upload(vec![photo]).await.unwrap();
        assert_eq!(uploaded[0].content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_empty_and_oversized_batches() {
        let (_, service) = service();
        assert!(matches!(
            service.upload(vec![]).await,
            Err(UploadServiceError::Rejected(UploadError::NoFiles))
        ));

        let files = (0..11).map(|i| pdf(&format!("{i}.pdf"))).collect();
        assert!(matches!(
            service.upload(files).await,
            Err(UploadServiceError::Rejected(UploadError::TooManyFiles { .. }))
        ));
    }
}
