//! Document handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pm_contracts::{Contract, DocumentContract};
use pm_core::result::OrNotFound;
use pm_core::traits::Id;
use pm_models::{CreateDocumentDto, Property};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub property_id: Option<Id>,
    pub tenant_id: Option<Id>,
}

/// GET /api/documents?propertyId=&tenantId=
pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<DocumentQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let property_id = query
        .property_id
        .ok_or_else(|| ApiError::bad_request("Property ID is required"))?;

    let documents = state
        .documents()
        .list(user.id(), property_id, query.tenant_id)
        .await?
        .or_not_found::<Property>(property_id)?;
    Ok(Json(documents))
}

/// POST /api/documents
///
/// Records a file previously stored through `POST /api/upload`.
pub async fn create_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateDocumentDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    DocumentContract.validate(&dto)?;

    let document = state.documents().create(user.id(), &dto).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// DELETE /api/documents/:id
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state.documents().delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
