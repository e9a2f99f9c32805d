//! Document repository

use chrono::{DateTime, Utc};
use pm_core::traits::Id;
use pm_models::{CreateDocumentDto, Document, DocumentCategory, DocumentType};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::repository::{decode, expect_affected, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub property_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub document_type: String,
    pub category: String,
    pub url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = RepositoryError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            document_type: decode("document_type", &row.document_type, DocumentType::parse)?,
            category: decode("category", &row.category, DocumentCategory::parse)?,
            id: row.id,
            property_id: row.property_id,
            tenant_id: row.tenant_id,
            name: row.name,
            url: row.url,
            file_size: row.file_size,
            mime_type: row.mime_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Documents of an owned property, optionally only one tenant's.
    ///
    /// Returns `None` when the property is not owned by `user_id`.
    pub async fn list(
        &self,
        user_id: &str,
        property_id: Id,
        tenant_id: Option<Id>,
    ) -> RepositoryResult<Option<Vec<Document>>> {
        if !self.property_owned(user_id, property_id).await? {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, property_id, tenant_id, name, document_type, category, url, file_size,
                   mime_type, created_at, updated_at
            FROM documents
            WHERE property_id = $1 AND ($2::uuid IS NULL OR tenant_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(property_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Document::try_from)
            .collect::<RepositoryResult<Vec<_>>>()
            .map(Some)
    }

    /// Record an uploaded file against an owned property.
    ///
    /// Fails with `NotFound("Property")` for a foreign property and
    /// `NotFound("Tenant")` when the tenant does not live in it.
    #[instrument(skip(self, dto), fields(property_id = %dto.property_id))]
    pub async fn create(
        &self,
        user_id: &str,
        dto: &CreateDocumentDto,
    ) -> RepositoryResult<Document> {
        if !self.property_owned(user_id, dto.property_id).await? {
            return Err(RepositoryError::NotFound("Property"));
        }

        if let Some(tenant_id) = dto.tenant_id {
            let in_property: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM tenants t
                    JOIN units u ON u.id = t.unit_id
                    WHERE t.id = $1 AND u.property_id = $2
                )
                "#,
            )
            .bind(tenant_id)
            .bind(dto.property_id)
            .fetch_one(&self.pool)
            .await?;
            if !in_property {
                return Err(RepositoryError::NotFound("Tenant"));
            }
        }

        let now = Utc::now();
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO documents (id, property_id, tenant_id, name, document_type, category, url,
                                   file_size, mime_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id, property_id, tenant_id, name, document_type, category, url, file_size,
                      mime_type, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(dto.property_id)
        .bind(dto.tenant_id)
        .bind(dto.name.trim())
        .bind(dto.document_type.as_str())
        .bind(dto.category.as_str())
        .bind(&dto.url)
        .bind(dto.file_size)
        .bind(dto.mime_type())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(document_id = %row.id, "Document recorded");
        Document::try_from(row)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM documents d
            USING properties p
            WHERE d.id = $1 AND p.id = d.property_id AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        expect_affected(result.rows_affected(), "Document")
    }

    async fn property_owned(&self, user_id: &str, property_id: Id) -> RepositoryResult<bool> {
        let owned = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM properties WHERE id = $1 AND user_id = $2)",
        )
        .bind(property_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }
}
