//! Multipart upload handler

use axum::{
    body::Bytes,
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use pm_core::error::PmError;
use pm_uploads::{
    accepted_type, IncomingFile, StorageError, UploadError, UploadPolicy, UploadServiceError,
    UploadedFile,
};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

/// Form field carrying the files
const FILES_FIELD: &str = "files";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
    pub files: Vec<UploadedFile>,
}

/// POST /api/upload
pub async fn upload_files(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let max_files = state.uploads.policy().max_files;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        if files.len() == max_files {
            return Err(ApiError::bad_request(
                UploadError::TooManyFiles {
                    count: files.len() + 1,
                    max: max_files,
                }
                .to_string(),
            ));
        }

        let filename = field.file_name().unwrap_or("file").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = read_limited(field, state.uploads.policy(), &filename, content_type.as_deref())
            .await?;
        files.push(IncomingFile::new(filename, content_type, data));
    }

    let uploaded = state.uploads.upload(files).await?;
    tracing::info!(user_id = %user.id, count = uploaded.len(), "Files uploaded");

    Ok(Json(UploadResponse {
        urls: uploaded.iter().map(|f| f.url.clone()).collect(),
        files: uploaded,
    }))
}

/// Read one part, failing as soon as it exceeds the limit for its kind
async fn read_limited(
    mut field: Field<'_>,
    policy: &UploadPolicy,
    filename: &str,
    content_type: Option<&str>,
) -> ApiResult<Bytes> {
    let kind = policy
        .check_file(filename, content_type, 0)
        .map_err(UploadServiceError::from)?;
    let max = policy.limit_for(kind);

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        let size = (data.len() + chunk.len()) as u64;
        if size > max {
            return Err(UploadServiceError::from(UploadError::FileTooLarge {
                filename: filename.to_string(),
                size,
                max,
            })
            .into());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(data))
}

/// GET <storage base url>/*key
///
/// Public, like the URLs handed out by the upload route. Only accepted
/// image and PDF types are served inline; anything else is a download.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Response> {
    let data = state.uploads.store().get(&key).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidPath(_) => {
            ApiError::not_found("File", &key)
        }
        other => PmError::Storage(other.to_string()).into(),
    })?;

    let mut response = data.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    match accepted_type(&key) {
        Some((mime, _)) => {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        }
        None => {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            );
            headers.insert(
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment"),
            );
        }
    }
    Ok(response)
}
