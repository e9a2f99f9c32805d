//! Maintenance request repository

use chrono::{DateTime, Utc};
use pm_core::traits::Id;
use pm_models::{
    CreateMaintenanceRequestDto, MaintenanceCategory, MaintenancePriority, MaintenanceRequest,
    MaintenanceStatus, MaintenanceWithContext,
};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::repository::{decode, expect_affected, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceRow {
    pub id: Uuid,
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub category: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub cost: Option<f64>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<MaintenanceRow> for MaintenanceRequest {
    type Error = RepositoryError;

    fn try_from(row: MaintenanceRow) -> Result<Self, Self::Error> {
        Ok(MaintenanceRequest {
            priority: decode("priority", &row.priority, MaintenancePriority::parse)?,
            category: decode("category", &row.category, MaintenanceCategory::parse)?,
            status: decode("status", &row.status, MaintenanceStatus::parse)?,
            id: row.id,
            property_id: row.property_id,
            tenant_id: row.tenant_id,
            title: row.title,
            description: row.description,
            assigned_to: row.assigned_to,
            cost: row.cost,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct MaintenanceContextRow {
    #[sqlx(flatten)]
    request: MaintenanceRow,
    tenant_name: String,
    property_name: String,
}

impl TryFrom<MaintenanceContextRow> for MaintenanceWithContext {
    type Error = RepositoryError;

    fn try_from(row: MaintenanceContextRow) -> Result<Self, Self::Error> {
        Ok(MaintenanceWithContext {
            request: MaintenanceRequest::try_from(row.request)?,
            tenant_name: row.tenant_name,
            property_name: row.property_name,
        })
    }
}

/// Optional narrowing for [`MaintenanceRepository::list`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceFilter {
    pub property_id: Option<Id>,
    pub tenant_id: Option<Id>,
}

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Owned requests, newest first, optionally capped at `limit`
    pub async fn list(
        &self,
        user_id: &str,
        filter: MaintenanceFilter,
        limit: Option<i64>,
    ) -> RepositoryResult<Vec<MaintenanceWithContext>> {
        let rows = sqlx::query_as::<_, MaintenanceContextRow>(
            r#"
            SELECT m.id, m.property_id, m.tenant_id, m.title, m.description, m.priority,
                   m.category, m.status, m.assigned_to, m.cost, m.images, m.created_at,
                   m.updated_at, m.completed_at,
                   t.first_name || ' ' || t.last_name AS tenant_name,
                   p.name AS property_name
            FROM maintenance_requests m
            JOIN properties p ON p.id = m.property_id
            JOIN tenants t ON t.id = m.tenant_id
            WHERE p.user_id = $1
              AND ($2::uuid IS NULL OR m.property_id = $2)
              AND ($3::uuid IS NULL OR m.tenant_id = $3)
            ORDER BY m.created_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(filter.property_id)
        .bind(filter.tenant_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MaintenanceWithContext::try_from).collect()
    }

    pub async fn find(
        &self,
        user_id: &str,
        id: Id,
    ) -> RepositoryResult<Option<MaintenanceWithContext>> {
        let row = sqlx::query_as::<_, MaintenanceContextRow>(
            r#"
            SELECT m.id, m.property_id, m.tenant_id, m.title, m.description, m.priority,
                   m.category, m.status, m.assigned_to, m.cost, m.images, m.created_at,
                   m.updated_at, m.completed_at,
                   t.first_name || ' ' || t.last_name AS tenant_name,
                   p.name AS property_name
            FROM maintenance_requests m
            JOIN properties p ON p.id = m.property_id
            JOIN tenants t ON t.id = m.tenant_id
            WHERE m.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MaintenanceWithContext::try_from).transpose()
    }

    /// File a request against an owned property for one of its tenants.
    ///
    /// Returns `None` unless the tenant lives in that property and the
    /// property belongs to `user_id`.
    #[instrument(skip(self, dto), fields(property_id = %dto.property_id))]
    pub async fn create(
        &self,
        user_id: &str,
        dto: &CreateMaintenanceRequestDto,
    ) -> RepositoryResult<Option<MaintenanceRequest>> {
        let now = Utc::now();
        let completed_at = (dto.status == MaintenanceStatus::Completed).then_some(now);

        let row = sqlx::query_as::<_, MaintenanceRow>(
            r#"
            INSERT INTO maintenance_requests (id, property_id, tenant_id, title, description,
                                              priority, category, status, assigned_to, cost,
                                              images, created_at, updated_at, completed_at)
            SELECT $1, p.id, t.id, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12, $13
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            JOIN properties p ON p.id = u.property_id
            WHERE p.id = $2 AND t.id = $3 AND p.user_id = $14
            RETURNING id, property_id, tenant_id, title, description, priority, category, status,
                      assigned_to, cost, images, created_at, updated_at, completed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dto.property_id)
        .bind(dto.tenant_id)
        .bind(dto.title.trim())
        .bind(dto.description.trim())
        .bind(dto.priority.as_str())
        .bind(dto.category.as_str())
        .bind(dto.status.as_str())
        .bind(&dto.assigned_to)
        .bind(dto.cost)
        .bind(&dto.images)
        .bind(now)
        .bind(completed_at)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref row) = row {
            tracing::info!(request_id = %row.id, "Maintenance request created");
        }
        row.map(MaintenanceRequest::try_from).transpose()
    }

    /// Persist status, assignment, cost and timestamps of an owned request
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub async fn save(
        &self,
        user_id: &str,
        request: &MaintenanceRequest,
    ) -> RepositoryResult<MaintenanceRequest> {
        let row = sqlx::query_as::<_, MaintenanceRow>(
            r#"
            UPDATE maintenance_requests m
            SET status = $3, assigned_to = $4, cost = $5, updated_at = $6, completed_at = $7
            FROM properties p
            WHERE m.id = $1 AND p.id = m.property_id AND p.user_id = $2
            RETURNING m.id, m.property_id, m.tenant_id, m.title, m.description, m.priority,
                      m.category, m.status, m.assigned_to, m.cost, m.images, m.created_at,
                      m.updated_at, m.completed_at
            "#,
        )
        .bind(request.id)
        .bind(user_id)
        .bind(request.status.as_str())
        .bind(&request.assigned_to)
        .bind(request.cost)
        .bind(request.updated_at)
        .bind(request.completed_at)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound("MaintenanceRequest"))
            .and_then(MaintenanceRequest::try_from)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM maintenance_requests m
            USING properties p
            WHERE m.id = $1 AND p.id = m.property_id AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected(), "MaintenanceRequest")
    }
}
