//! What may be uploaded

use thiserror::Error;

const MB: u64 = 1024 * 1024;

/// Accepted upload kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
}

/// Content types served inline; anything else is refused at upload.
/// SVG is left out since it can carry script.
const ACCEPTED_TYPES: &[(&str, FileKind)] = &[
    ("image/png", FileKind::Image),
    ("image/jpeg", FileKind::Image),
    ("image/gif", FileKind::Image),
    ("image/webp", FileKind::Image),
    ("application/pdf", FileKind::Pdf),
];

impl FileKind {
    /// Classify from the filename extension.
    ///
    /// A declared content type must be one the extension maps to; the
    /// extension is what the file is later served as.
    pub fn classify(content_type: Option<&str>, filename: &str) -> Option<Self> {
        let (_, kind) = accepted_type(filename)?;

        let declared = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

        match declared {
            None => Some(kind),
            Some(ct) => mime_guess::from_path(filename)
                .iter()
                .any(|m| m.essence_str() == ct)
                .then_some(kind),
        }
    }
}

/// Accepted content type for a filename or storage key, from its extension
pub fn accepted_type(filename: &str) -> Option<(&'static str, FileKind)> {
    mime_guess::from_path(filename).iter().find_map(|guess| {
        ACCEPTED_TYPES
            .iter()
            .find(|(mime, _)| *mime == guess.essence_str())
            .copied()
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No files provided")]
    NoFiles,
    #[error("Too many files: {count} (at most {max})")]
    TooManyFiles { count: usize, max: usize },
    #[error("Unsupported file type for {filename}: {content_type}")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },
    #[error("{filename} is too large: {size} bytes (at most {max})")]
    FileTooLarge { filename: String, size: u64, max: u64 },
}

/// Per-request upload limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_image_bytes: u64,
    pub max_pdf_bytes: u64,
    pub max_files: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_image_bytes: 4 * MB,
            max_pdf_bytes: 8 * MB,
            max_files: 10,
        }
    }
}

impl UploadPolicy {
    pub fn limit_for(&self, kind: FileKind) -> u64 {
        match kind {
            FileKind::Image => self.max_image_bytes,
            FileKind::Pdf => self.max_pdf_bytes,
        }
    }

    pub fn check_count(&self, count: usize) -> Result<(), UploadError> {
        if count == 0 {
            return Err(UploadError::NoFiles);
        }
        if count > self.max_files {
            return Err(UploadError::TooManyFiles {
                count,
                max: self.max_files,
            });
        }
        Ok(())
    }

    /// Check one file; returns its kind when accepted
    pub fn check_file(
        &self,
        filename: &str,
        content_type: Option<&str>,
        size: u64,
    ) -> Result<FileKind, UploadError> {
        let kind = FileKind::classify(content_type, filename).ok_or_else(|| {
            UploadError::UnsupportedType {
                filename: filename.to_string(),
                content_type: content_type.unwrap_or("unknown").to_string(),
            }
        })?;

        let max = self.limit_for(kind);
        if size > max {
            return Err(UploadError::FileTooLarge {
                filename: filename.to_string(),
                size,
                max,
            });
        }
        Ok(kind)
    }
}
