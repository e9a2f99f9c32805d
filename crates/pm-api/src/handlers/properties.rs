//! Property and unit handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pm_contracts::{Contract, PropertyContract, UnitContract};
use pm_core::result::OrNotFound;
use pm_core::traits::Id;
use pm_models::{CreatePropertyDto, CreateUnitDto, Property, UpdatePropertyDto};
use pm_stats::compute_property_stats;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/properties
pub async fn list_properties(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let properties = state.properties().list(user.id()).await?;
    Ok(Json(properties))
}

/// POST /api/properties
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreatePropertyDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    PropertyContract::new().validate(&dto)?;

    let property = state.properties().create(user.id(), dto).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

/// GET /api/properties/:id
///
/// The property with its units, tenants, requests and documents.
pub async fn get_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state
        .properties()
        .snapshot(user.id(), id)
        .await?
        .or_not_found::<Property>(id)?;
    Ok(Json(snapshot))
}

/// PATCH /api/properties/:id
pub async fn update_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    payload: Result<Json<UpdatePropertyDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    PropertyContract::new().validate(&dto)?;

    let property = state
        .properties()
        .update(user.id(), id, &dto)
        .await?
        .or_not_found::<Property>(id)?;
    Ok(Json(property))
}

/// DELETE /api/properties/:id
pub async fn delete_property(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state.properties().delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/properties/:id/dashboard
pub async fn property_dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state
        .properties()
        .snapshot(user.id(), id)
        .await?
        .or_not_found::<Property>(id)?;
    Ok(Json(compute_property_stats(&snapshot)))
}

/// GET /api/properties/:id/units
pub async fn list_units(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let units = state
        .units()
        .list_for_property(user.id(), id)
        .await?
        .or_not_found::<Property>(id)?;
    Ok(Json(units))
}

/// POST /api/properties/:id/units
pub async fn create_unit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    payload: Result<Json<CreateUnitDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    UnitContract.validate(&dto)?;

    let unit = state
        .units()
        .create(user.id(), id, &dto)
        .await?
        .or_not_found::<Property>(id)?;
    Ok((StatusCode::CREATED, Json(unit)))
}
