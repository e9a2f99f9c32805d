//! # pm-uploads
//!
//! Upload handling for Property Manager RS: which files are accepted
//! (images up to 4 MB, PDFs up to 8 MB, ten per request) and where they
//! are kept.

pub mod policy;
pub mod service;
pub mod storage;

pub use policy::{accepted_type, FileKind, UploadError, UploadPolicy};
pub use service::{IncomingFile, UploadService, UploadServiceError, UploadedFile};
pub use storage::{
    content_type_for, generate_key, sanitize_filename, sha256_hex, FileStore, LocalStore,
    MemoryStore, StorageError, StorageResult, StoredFile,
};
