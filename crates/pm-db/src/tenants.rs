//! Tenant repository
//!
//! Assigning and removing a tenant also rewrites the unit's status column
//! inside the same transaction.

use chrono::{DateTime, NaiveDate, Utc};
use pm_core::traits::Id;
use pm_models::{CreateTenantDto, Tenant, TenantStatus, TenantWithUnit, UnitStatus};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::repository::{decode, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
pub struct TenantRow {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub emergency_contact: Option<String>,
    pub lease_start: NaiveDate,
    pub lease_end: NaiveDate,
    pub rent_amount: f64,
    pub deposit_amount: f64,
    pub payment_due: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = RepositoryError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        Ok(Tenant {
            status: decode("status", &row.status, TenantStatus::parse)?,
            id: row.id,
            unit_id: row.unit_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            emergency_contact: row.emergency_contact,
            lease_start: row.lease_start,
            lease_end: row.lease_end,
            rent_amount: row.rent_amount,
            deposit_amount: row.deposit_amount,
            payment_due: row.payment_due,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct TenantListingRow {
    #[sqlx(flatten)]
    tenant: TenantRow,
    unit_number: String,
    property_id: Uuid,
    property_name: String,
}

impl TryFrom<TenantListingRow> for TenantWithUnit {
    type Error = RepositoryError;

    fn try_from(row: TenantListingRow) -> Result<Self, Self::Error> {
        Ok(TenantWithUnit {
            tenant: Tenant::try_from(row.tenant)?,
            unit_number: row.unit_number,
            property_id: row.property_id,
            property_name: row.property_name,
        })
    }
}

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tenants across every owned property, ordered by last name
    pub async fn list(&self, user_id: &str) -> RepositoryResult<Vec<TenantWithUnit>> {
        let rows = sqlx::query_as::<_, TenantListingRow>(
            r#"
            SELECT t.id, t.unit_id, t.first_name, t.last_name, t.email, t.phone,
                   t.emergency_contact, t.lease_start, t.lease_end, t.rent_amount,
                   t.deposit_amount, t.payment_due, t.status, t.created_at, t.updated_at,
                   u.unit_number, p.id AS property_id, p.name AS property_name
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            JOIN properties p ON p.id = u.property_id
            WHERE p.user_id = $1
            ORDER BY t.last_name ASC, t.first_name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TenantWithUnit::try_from).collect()
    }

    pub async fn find(&self, user_id: &str, id: Id) -> RepositoryResult<Option<TenantWithUnit>> {
        let row = sqlx::query_as::<_, TenantListingRow>(
            r#"
            SELECT t.id, t.unit_id, t.first_name, t.last_name, t.email, t.phone,
                   t.emergency_contact, t.lease_start, t.lease_end, t.rent_amount,
                   t.deposit_amount, t.payment_due, t.status, t.created_at, t.updated_at,
                   u.unit_number, p.id AS property_id, p.name AS property_name
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            JOIN properties p ON p.id = u.property_id
            WHERE t.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TenantWithUnit::try_from).transpose()
    }

    /// Put a tenant into a vacant unit of an owned property
    #[instrument(skip(self, dto), fields(unit_id = %dto.unit_id))]
    pub async fn create(&self, user_id: &str, dto: &CreateTenantDto) -> RepositoryResult<Tenant> {
        let mut tx = self.pool.begin().await?;

        // Lock the unit so two concurrent assignments cannot both see it vacant
        let unit: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT u.id
            FROM units u
            JOIN properties p ON p.id = u.property_id
            WHERE u.id = $1 AND p.user_id = $2
            FOR UPDATE OF u
            "#,
        )
        .bind(dto.unit_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let unit_id = unit.ok_or(RepositoryError::NotFound("Unit"))?;

        let occupied: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tenants WHERE unit_id = $1)")
                .bind(unit_id)
                .fetch_one(&mut *tx)
                .await?;
        if occupied {
            return Err(RepositoryError::Conflict(
                "Unit already has a tenant".to_string(),
            ));
        }

        let now = Utc::now();
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            INSERT INTO tenants (id, unit_id, first_name, last_name, email, phone,
                                 emergency_contact, lease_start, lease_end, rent_amount,
                                 deposit_amount, payment_due, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING id, unit_id, first_name, last_name, email, phone, emergency_contact,
                      lease_start, lease_end, rent_amount, deposit_amount, payment_due, status,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(unit_id)
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.email.trim())
        .bind(&dto.phone)
        .bind(&dto.emergency_contact)
        .bind(dto.lease_start)
        .bind(dto.lease_end)
        .bind(dto.rent_amount)
        .bind(dto.deposit_amount)
        .bind(dto.payment_due)
        .bind(dto.status.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        set_unit_status(&mut tx, unit_id, UnitStatus::Occupied, now).await?;
        tx.commit().await?;

        tracing::info!(tenant_id = %row.id, "Tenant assigned to unit");
        Tenant::try_from(row)
    }

    /// Write back every editable column of an owned tenant
    #[instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
    pub async fn save(&self, user_id: &str, tenant: &Tenant) -> RepositoryResult<Tenant> {
        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            UPDATE tenants t
            SET first_name = $3, last_name = $4, email = $5, phone = $6, emergency_contact = $7,
                lease_start = $8, lease_end = $9, rent_amount = $10, deposit_amount = $11,
                payment_due = $12, status = $13, updated_at = $14
            FROM units u
            JOIN properties p ON p.id = u.property_id
            WHERE t.id = $1 AND u.id = t.unit_id AND p.user_id = $2
            RETURNING t.id, t.unit_id, t.first_name, t.last_name, t.email, t.phone,
                      t.emergency_contact, t.lease_start, t.lease_end, t.rent_amount,
                      t.deposit_amount, t.payment_due, t.status, t.created_at, t.updated_at
            "#,
        )
        .bind(tenant.id)
        .bind(user_id)
        .bind(&tenant.first_name)
        .bind(&tenant.last_name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(&tenant.emergency_contact)
        .bind(tenant.lease_start)
        .bind(tenant.lease_end)
        .bind(tenant.rent_amount)
        .bind(tenant.deposit_amount)
        .bind(tenant.payment_due)
        .bind(tenant.status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound("Tenant"))
            .and_then(Tenant::try_from)
    }

    /// Remove a tenant and mark the unit vacant again
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, id: Id) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let unit_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            DELETE FROM tenants t
            USING units u, properties p
            WHERE t.id = $1 AND u.id = t.unit_id AND p.id = u.property_id AND p.user_id = $2
            RETURNING t.unit_id
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let unit_id = unit_id.ok_or(RepositoryError::NotFound("Tenant"))?;

        set_unit_status(&mut tx, unit_id, UnitStatus::Vacant, Utc::now()).await?;
        tx.commit().await?;

        tracing::info!(tenant_id = %id, unit_id = %unit_id, "Tenant removed; unit vacant");
        Ok(())
    }
}

async fn set_unit_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    unit_id: Uuid,
    status: UnitStatus,
    now: DateTime<Utc>,
) -> RepositoryResult<()> {
    sqlx::query("UPDATE units SET status = $2, updated_at = $3 WHERE id = $1")
        .bind(unit_id)
        .bind(status.as_str())
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
