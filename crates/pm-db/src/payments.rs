//! Payment repository

use chrono::{DateTime, Utc};
use pm_core::traits::Id;
use pm_models::{CreatePaymentDto, Payment, PaymentStatus, PaymentWithTenant};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::{decode, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub amount: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            status: decode("status", &row.status, PaymentStatus::parse)?,
            id: row.id,
            tenant_id: row.tenant_id,
            amount: row.amount,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct PaymentTenantRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    tenant_name: String,
}

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Payments of an owned tenant, newest first.
    ///
    /// Returns `None` when the tenant is not reachable from `user_id`.
    pub async fn list_for_tenant(
        &self,
        user_id: &str,
        tenant_id: Id,
    ) -> RepositoryResult<Option<Vec<Payment>>> {
        if !self.tenant_owned(user_id, tenant_id).await? {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, tenant_id, amount, status, created_at
            FROM payments
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Payment::try_from)
            .collect::<RepositoryResult<Vec<_>>>()
            .map(Some)
    }

    /// Newest payments across all owned tenants
    pub async fn recent(
        &self,
        user_id: &str,
        limit: i64,
    ) -> RepositoryResult<Vec<PaymentWithTenant>> {
        let rows = sqlx::query_as::<_, PaymentTenantRow>(
            r#"
            SELECT pay.id, pay.tenant_id, pay.amount, pay.status, pay.created_at,
                   t.first_name || ' ' || t.last_name AS tenant_name
            FROM payments pay
            JOIN tenants t ON t.id = pay.tenant_id
            JOIN units u ON u.id = t.unit_id
            JOIN properties p ON p.id = u.property_id
            WHERE p.user_id = $1
            ORDER BY pay.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PaymentWithTenant {
                    payment: Payment::try_from(row.payment)?,
                    tenant_name: row.tenant_name,
                })
            })
            .collect()
    }

    /// Record a payment for an owned tenant; `None` if not reachable
    pub async fn create(
        &self,
        user_id: &str,
        tenant_id: Id,
        dto: &CreatePaymentDto,
    ) -> RepositoryResult<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments (id, tenant_id, amount, status, created_at)
            SELECT $1, t.id, $3, $4, $5
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            JOIN properties p ON p.id = u.property_id
            WHERE t.id = $2 AND p.user_id = $6
            RETURNING id, tenant_id, amount, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(dto.amount)
        .bind(dto.status.as_str())
        .bind(Utc::now())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref row) = row {
            tracing::info!(payment_id = %row.id, tenant_id = %tenant_id, "Payment recorded");
        }
        row.map(Payment::try_from).transpose()
    }

    async fn tenant_owned(&self, user_id: &str, tenant_id: Id) -> RepositoryResult<bool> {
        let owned = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM tenants t
                JOIN units u ON u.id = t.unit_id
                JOIN properties p ON p.id = u.property_id
                WHERE t.id = $1 AND p.user_id = $2
            )
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }
}
