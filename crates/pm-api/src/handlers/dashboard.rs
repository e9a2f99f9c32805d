//! Dashboard handler

use axum::{extract::State, Json};
use pm_stats::{load_dashboard, DashboardView};

use crate::extractors::{AppState, AuthenticatedUser};

/// GET /api/dashboard
///
/// Never fails once authenticated: unavailable data shows up as zero
/// counts and an empty feed.
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<DashboardView> {
    Json(load_dashboard(state.dashboard.as_ref(), user.id()).await)
}
