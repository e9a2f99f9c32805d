//! Unit repository

use chrono::{DateTime, Utc};
use pm_core::traits::Id;
use pm_models::{CreateUnitDto, Unit, UnitSnapshot, UnitStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::{decode, RepositoryError, RepositoryResult};
use crate::tenants::TenantRow;

#[derive(Debug, Clone, FromRow)]
pub struct UnitRow {
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UnitRow> for Unit {
    type Error = RepositoryError;

    fn try_from(row: UnitRow) -> Result<Self, Self::Error> {
        Ok(Unit {
            status: decode("status", &row.status, UnitStatus::parse)?,
            id: row.id,
            property_id: row.property_id,
            unit_number: row.unit_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Units of an owned property with their current tenants.
    ///
    /// Returns `None` when the property is not owned by `user_id`.
    pub async fn list_for_property(
        &self,
        user_id: &str,
        property_id: Id,
    ) -> RepositoryResult<Option<Vec<UnitSnapshot>>> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM properties WHERE id = $1 AND user_id = $2)",
        )
        .bind(property_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        if !owned {
            return Ok(None);
        }

        let units = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT id, property_id, unit_number, status, created_at, updated_at
            FROM units
            WHERE property_id = $1
            ORDER BY unit_number ASC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        let tenants = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT t.id, t.unit_id, t.first_name, t.last_name, t.email, t.phone,
                   t.emergency_contact, t.lease_start, t.lease_end, t.rent_amount,
                   t.deposit_amount, t.payment_due, t.status, t.created_at, t.updated_at
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            WHERE u.property_id = $1
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tenants = tenants
            .into_iter()
            .map(|row| pm_models::Tenant::try_from(row).map(|t| (t.unit_id, t)))
            .collect::<RepositoryResult<std::collections::HashMap<_, _>>>()?;

        let snapshots = units
            .into_iter()
            .map(|row| {
                let unit = Unit::try_from(row)?;
                let tenant = tenants.remove(&unit.id);
                Ok(UnitSnapshot { unit, tenant })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Some(snapshots))
    }

    /// Add a vacant unit to an owned property.
    ///
    /// Returns `None` when the property is not owned by `user_id`.
    pub async fn create(
        &self,
        user_id: &str,
        property_id: Id,
        dto: &CreateUnitDto,
    ) -> RepositoryResult<Option<Unit>> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UnitRow>(
            r#"
            INSERT INTO units (id, property_id, unit_number, status, created_at, updated_at)
            SELECT $1, p.id, $3, $4, $5, $5
            FROM properties p
            WHERE p.id = $2 AND p.user_id = $6
            RETURNING id, property_id, unit_number, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(property_id)
        .bind(dto.unit_number.trim())
        .bind(UnitStatus::Vacant.as_str())
        .bind(now)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref row) = row {
            tracing::info!(unit_id = %row.id, property_id = %property_id, "Unit created");
        }
        row.map(Unit::try_from).transpose()
    }
}
