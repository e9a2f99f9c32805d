//! Document contracts

use pm_core::error::ValidationErrors;
use pm_models::CreateDocumentDto;
use regex::Regex;
use std::sync::LazyLock;

use crate::base::{check_attributes, validate_present, Contract, ValidationResult};

/// Absolute http(s) URL or a path served by this application
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://[^\s/]+/\S*|/\S+)$").unwrap());

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentContract;

impl Contract<CreateDocumentDto> for DocumentContract {
    fn validate(&self, dto: &CreateDocumentDto) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        check_attributes(dto, &mut errors);
        validate_present("name", &dto.name, &mut errors);
        validate_present("url", &dto.url, &mut errors);
        if !errors.has_error("url") && !URL_PATTERN.is_match(&dto.url) {
            errors.add("url", "is not a valid URL");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm_models::{DocumentCategory, DocumentType};
    use uuid::Uuid;

    fn dto(url: &str) -> CreateDocumentDto {
        CreateDocumentDto {
            name: "Lease 2024".into(),
            document_type: DocumentType::Lease,
            category: DocumentCategory::Tenant,
            url: url.into(),
            property_id: Uuid::new_v4(),
            tenant_id: None,
            file_size: 1024,
        }
    }

    #[test]
    fn test_accepts_stored_and_remote_urls() {
        assert!(DocumentContract.validate(&dto("/uploads/abc/lease.pdf")).is_ok());
        assert!(DocumentContract
            .validate(&dto("https://files.example.com/f/lease.pdf"))
            .is_ok());
    }

    #[test]
    fn test_rejects_garbage_url() {
        let errors = DocumentContract.validate(&dto("not a url")).unwrap_err();
        assert_eq!(errors.get("url").map(Vec::len), Some(1));

        let errors = DocumentContract.validate(&dto("")).unwrap_err();
        assert!(errors.has_error("url"));
    }
}
