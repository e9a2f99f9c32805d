//! Application state and request extractors

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use pm_auth::{Authenticator, CurrentUser};
use pm_db::{
    DocumentRepository, MaintenanceRepository, PaymentRepository, PgDashboardSource,
    PropertyRepository, TenantRepository, UnitRepository,
};
use pm_stats::DashboardSource;
use pm_uploads::UploadService;
use sqlx::PgPool;

use crate::error::ApiError;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    pub auth: Authenticator,
    pub uploads: UploadService,
    pub dashboard: Arc<dyn DashboardSource>,
}

impl AppState {
    pub fn new(pool: PgPool, auth: Authenticator, uploads: UploadService) -> Self {
        Self {
            dashboard: Arc::new(PgDashboardSource::new(pool.clone())),
            pool,
            auth,
            uploads,
        }
    }

    /// Serve the dashboard from another source
    pub fn with_dashboard_source(mut self, source: Arc<dyn DashboardSource>) -> Self {
        self.dashboard = source;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn properties(&self) -> PropertyRepository {
        PropertyRepository::new(self.pool.clone())
    }

    pub fn units(&self) -> UnitRepository {
        UnitRepository::new(self.pool.clone())
    }

    pub fn tenants(&self) -> TenantRepository {
        TenantRepository::new(self.pool.clone())
    }

    pub fn maintenance(&self) -> MaintenanceRepository {
        MaintenanceRepository::new(self.pool.clone())
    }

    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.pool.clone())
    }

    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.pool.clone())
    }
}

/// The caller, verified from the bearer token
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = app_state.auth.authenticate(&parts.headers)?;
        tracing::debug!(user_id = %user.id, "Request authenticated");
        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
