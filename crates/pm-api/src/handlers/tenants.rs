//! Tenant and payment handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pm_contracts::{check_attributes, Contract, PaymentContract, TenantContract};
use pm_core::error::ValidationErrors;
use pm_core::result::OrNotFound;
use pm_core::traits::Id;
use pm_models::{CreatePaymentDto, CreateTenantDto, Tenant, UpdateTenantDto};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/tenants
pub async fn list_tenants(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let tenants = state.tenants().list(user.id()).await?;
    Ok(Json(tenants))
}

/// POST /api/tenants
///
/// 404 when the unit is not the caller's, 409 when it already has a tenant.
pub async fn create_tenant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateTenantDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    TenantContract::new().validate(&dto)?;

    let tenant = state.tenants().create(user.id(), &dto).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

/// GET /api/tenants/:id
pub async fn get_tenant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let tenant = state
        .tenants()
        .find(user.id(), id)
        .await?
        .or_not_found::<Tenant>(id)?;
    Ok(Json(tenant))
}

/// PATCH /api/tenants/:id
pub async fn update_tenant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    payload: Result<Json<UpdateTenantDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    let mut errors = ValidationErrors::new();
    check_attributes(&dto, &mut errors);
    errors.into_result()?;

    let repo = state.tenants();
    let mut tenant = repo
        .find(user.id(), id)
        .await?
        .or_not_found::<Tenant>(id)?
        .tenant;

    dto.apply_to(&mut tenant);
    // Lease dates and amounts are checked on the merged record
    TenantContract::new().validate(&tenant)?;

    let tenant = repo.save(user.id(), &tenant).await?;
    Ok(Json(tenant))
}

/// DELETE /api/tenants/:id
///
/// The unit becomes vacant again.
pub async fn delete_tenant(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    state.tenants().delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/tenants/:id/payments
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let payments = state
        .payments()
        .list_for_tenant(user.id(), id)
        .await?
        .or_not_found::<Tenant>(id)?;
    Ok(Json(payments))
}

/// POST /api/tenants/:id/payments
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    payload: Result<Json<CreatePaymentDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(dto) = payload?;
    PaymentContract.validate(&dto)?;

    let payment = state
        .payments()
        .create(user.id(), id, &dto)
        .await?
        .or_not_found::<Tenant>(id)?;
    Ok((StatusCode::CREATED, Json(payment)))
}
