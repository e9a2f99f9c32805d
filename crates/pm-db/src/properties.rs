//! Property repository
//!
//! Also assembles [`PropertySnapshot`]s: one query per table for all of a
//! user's properties, stitched together in memory.

use chrono::{DateTime, Utc};
use pm_core::traits::Id;
use pm_models::{
    CreatePropertyDto, Property, PropertySnapshot, PropertyStatus, PropertyType, UnitSnapshot,
    UpdatePropertyDto,
};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

use crate::documents::DocumentRow;
use crate::maintenance::MaintenanceRow;
use crate::repository::{decode, expect_affected, RepositoryResult};
use crate::tenants::TenantRow;
use crate::units::UnitRow;

/// Property database row
#[derive(Debug, Clone, FromRow)]
pub struct PropertyRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub property_type: String,
    pub price: f64,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub size: f64,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = crate::RepositoryError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(Property {
            property_type: decode("property_type", &row.property_type, PropertyType::parse)?,
            status: decode("status", &row.status, PropertyStatus::parse)?,
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            address: row.address,
            price: row.price,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            size: row.size,
            features: row.features,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_properties(rows: Vec<PropertyRow>) -> RepositoryResult<Vec<Property>> {
    rows.into_iter().map(Property::try_from).collect()
}

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Properties owned by `user_id`, newest first
    pub async fn list(&self, user_id: &str) -> RepositoryResult<Vec<Property>> {
        let rows = sqlx::query_as::<_, PropertyRow>(
            r#"
            SELECT id, user_id, name, description, address, property_type, price, bedrooms,
                   bathrooms, size, features, images, status, created_at, updated_at
            FROM properties
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_properties(rows)
    }

    pub async fn find(&self, user_id: &str, id: Id) -> RepositoryResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            SELECT id, user_id, name, description, address, property_type, price, bedrooms,
                   bathrooms, size, features, images, status, created_at, updated_at
            FROM properties
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Property::try_from).transpose()
    }

    #[instrument(skip(self, dto))]
    pub async fn create(
        &self,
        user_id: &str,
        dto: CreatePropertyDto,
    ) -> RepositoryResult<Property> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            INSERT INTO properties (id, user_id, name, description, address, property_type, price,
                                    bedrooms, bathrooms, size, features, images, status,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            RETURNING id, user_id, name, description, address, property_type, price, bedrooms,
                      bathrooms, size, features, images, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(dto.name.trim())
        .bind(dto.description.unwrap_or_default())
        .bind(dto.address.trim())
        .bind(dto.property_type.unwrap_or_default().as_str())
        .bind(dto.price.unwrap_or(0.0))
        .bind(dto.bedrooms.unwrap_or(0))
        .bind(dto.bathrooms.unwrap_or(0.0))
        .bind(dto.size.unwrap_or(0.0))
        .bind(dto.features.unwrap_or_default())
        .bind(dto.images.unwrap_or_default())
        .bind(dto.status.unwrap_or_default().as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(property_id = %row.id, "Property created");
        Property::try_from(row)
    }

    /// Apply `dto` to the stored property and write it back
    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        user_id: &str,
        id: Id,
        dto: &UpdatePropertyDto,
    ) -> RepositoryResult<Option<Property>> {
        let Some(mut property) = self.find(user_id, id).await? else {
            return Ok(None);
        };
        dto.apply_to(&mut property);

        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            UPDATE properties
            SET name = $3, description = $4, address = $5, property_type = $6, price = $7,
                bedrooms = $8, bathrooms = $9, size = $10, features = $11, images = $12,
                status = $13, updated_at = $14
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, address, property_type, price, bedrooms,
                      bathrooms, size, features, images, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&property.name)
        .bind(&property.description)
        .bind(&property.address)
        .bind(property.property_type.as_str())
        .bind(property.price)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.size)
        .bind(&property.features)
        .bind(&property.images)
        .bind(property.status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Property::try_from).transpose()
    }

    /// Delete a property; units, tenants, requests and documents cascade
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        expect_affected(result.rows_affected(), "Property")?;
        tracing::info!(property_id = %id, "Property deleted");
        Ok(())
    }

    /// Every owned property with its units, tenants, requests and documents
    #[instrument(skip(self))]
    pub async fn snapshots(&self, user_id: &str) -> RepositoryResult<Vec<PropertySnapshot>> {
        let properties = self.list(user_id).await?;
        self.assemble(user_id, properties, None).await
    }

    /// One owned property with its graph loaded
    pub async fn snapshot(
        &self,
        user_id: &str,
        id: Id,
    ) -> RepositoryResult<Option<PropertySnapshot>> {
        let Some(property) = self.find(user_id, id).await? else {
            return Ok(None);
        };
        let mut snapshots = self.assemble(user_id, vec![property], Some(id)).await?;
        Ok(snapshots.pop())
    }

    async fn assemble(
        &self,
        user_id: &str,
        properties: Vec<Property>,
        only: Option<Id>,
    ) -> RepositoryResult<Vec<PropertySnapshot>> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }

        let units = sqlx::query_as::<_, UnitRow>(
            r#"
            SELECT u.id, u.property_id, u.unit_number, u.status, u.created_at, u.updated_at
            FROM units u
            JOIN properties p ON p.id = u.property_id
            WHERE p.user_id = $1 AND ($2::uuid IS NULL OR p.id = $2)
            ORDER BY u.unit_number ASC
            "#,
        )
        .bind(user_id)
        .bind(only)
        .fetch_all(&self.pool)
        .await?;

        let tenants = sqlx::query_as::<_, TenantRow>(
            r#"
            SELECT t.id, t.unit_id, t.first_name, t.last_name, t.email, t.phone,
                   t.emergency_contact, t.lease_start, t.lease_end, t.rent_amount,
                   t.deposit_amount, t.payment_due, t.status, t.created_at, t.updated_at
            FROM tenants t
            JOIN units u ON u.id = t.unit_id
            JOIN properties p ON p.id = u.property_id
            WHERE p.user_id = $1 AND ($2::uuid IS NULL OR p.id = $2)
            "#,
        )
        .bind(user_id)
        .bind(only)
        .fetch_all(&self.pool)
        .await?;

        let requests = sqlx::query_as::<_, MaintenanceRow>(
            r#"
            SELECT m.id, m.property_id, m.tenant_id, m.title, m.description, m.priority,
                   m.category, m.status, m.assigned_to, m.cost, m.images, m.created_at,
                   m.updated_at, m.completed_at
            FROM maintenance_requests m
            JOIN properties p ON p.id = m.property_id
            WHERE p.user_id = $1 AND ($2::uuid IS NULL OR p.id = $2)
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(only)
        .fetch_all(&self.pool)
        .await?;

        let documents = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT d.id, d.property_id, d.tenant_id, d.name, d.document_type, d.category, d.url,
                   d.file_size, d.mime_type, d.created_at, d.updated_at
            FROM documents d
            JOIN properties p ON p.id = d.property_id
            WHERE p.user_id = $1 AND ($2::uuid IS NULL OR p.id = $2)
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(only)
        .fetch_all(&self.pool)
        .await?;

        let mut tenants_by_unit = HashMap::with_capacity(tenants.len());
        for row in tenants {
            let tenant = pm_models::Tenant::try_from(row)?;
            tenants_by_unit.insert(tenant.unit_id, tenant);
        }

        let mut snapshots: Vec<PropertySnapshot> =
            properties.into_iter().map(PropertySnapshot::new).collect();
        let index: HashMap<Id, usize> = snapshots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.property.id, i))
            .collect();

        for row in units {
            let unit = pm_models::Unit::try_from(row)?;
            if let Some(&i) = index.get(&unit.property_id) {
                let tenant = tenants_by_unit.remove(&unit.id);
                snapshots[i].units.push(UnitSnapshot { unit, tenant });
            }
        }
        for row in requests {
            let request = pm_models::MaintenanceRequest::try_from(row)?;
            if let Some(&i) = index.get(&request.property_id) {
                snapshots[i].maintenance_requests.push(request);
            }
        }
        for row in documents {
            let document = pm_models::Document::try_from(row)?;
            if let Some(&i) = index.get(&document.property_id) {
                snapshots[i].documents.push(document);
            }
        }

        Ok(snapshots)
    }
}
