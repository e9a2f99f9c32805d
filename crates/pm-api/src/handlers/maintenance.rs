//! Maintenance request handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use pm_contracts::{Contract, MaintenanceContract};
use pm_core::result::OrNotFound;
use pm_core::traits::Id;
use pm_db::MaintenanceFilter;
use pm_models::{
    CreateMaintenanceRequestDto, MaintenanceRequest, Tenant, UpdateMaintenanceRequestDto,
};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceQuery {
    pub property_id: Option<Id>,
    pub tenant_id: Option<Id>,
}

impl From<MaintenanceQuery> for MaintenanceFilter {
    fn from(query: MaintenanceQuery) -> Self {
        MaintenanceFilter {
            property_id: query.property_id,
            tenant_id: query.tenant_id,
        }
    }
}

/// GET /api/maintenance?propertyId=&tenantId=
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<MaintenanceQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let requests = state
        .maintenance()
        .list(user.id(), query.into(), None)
        .await?;
    Ok(Json(requests))
}

/// POST /api/maintenance
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateMaintenanceRequestDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    MaintenanceContract.validate(&dto)?;

    let request = state
        .maintenance()
        .create(user.id(), &dto)
        .await?
        .or_not_found::<Tenant>(dto.tenant_id)?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/maintenance/:id
pub async fn get_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let request = state
        .maintenance()
        .find(user.id(), id)
        .await?
        .or_not_found::<MaintenanceRequest>(id)?;
    Ok(Json(request))
}

/// PATCH /api/maintenance/:id
///
/// Status changes keep `completedAt` in step: set on completion, cleared
/// when the request is reopened.
pub async fn update_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    payload: Result<Json<UpdateMaintenanceRequestDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    MaintenanceContract.validate(&dto)?;

    let repo = state.maintenance();
    let mut request = repo
        .find(user.id(), id)
        .await?
        .or_not_found::<MaintenanceRequest>(id)?
        .request;

    let previous = request.status;
    dto.apply_to(&mut request, Utc::now());
    let request = repo.save(user.id(), &request).await?;

    if request.status != previous {
        tracing::info!(
            request_id = %id,
            from = previous.as_str(),
            to = request.status.as_str(),
            "Maintenance status changed"
        );
    }
    Ok(Json(request))
}

/// DELETE /api/maintenance/:id
pub async fn delete_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state.maintenance().delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
