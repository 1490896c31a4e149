use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Brand record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub categories: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const BRAND_COLUMNS: &str = "id, title, description, logo, categories, created_at, updated_at";

impl Brand {
    pub async fn create(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
        logo: Option<&str>,
        categories: &[String],
    ) -> sqlx::Result<Brand> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            INSERT INTO brands (title, description, logo, categories)
            VALUES ($1, $2, $3, $4)
            RETURNING {BRAND_COLUMNS}
            "#,
        ))
        .bind(title)
        .bind(description)
        .bind(logo)
        .bind(categories)
        .fetch_one(db)
        .await?;
        Ok(brand)
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Brand>> {
        let brands = sqlx::query_as::<_, Brand>(&format!(
            r#"
            SELECT {BRAND_COLUMNS}
            FROM brands
            ORDER BY created_at DESC
            "#,
        ))
        .fetch_all(db)
        .await?;
        Ok(brands)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            SELECT {BRAND_COLUMNS}
            FROM brands
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(brand)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        logo: Option<&str>,
        categories: Option<&[String]>,
    ) -> sqlx::Result<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            UPDATE brands
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                logo = COALESCE($4, logo),
                categories = COALESCE($5, categories),
                updated_at = now()
            WHERE id = $1
            RETURNING {BRAND_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(logo)
        .bind(categories)
        .fetch_optional(db)
        .await?;
        Ok(brand)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>(&format!(
            r#"
            DELETE FROM brands
            WHERE id = $1
            RETURNING {BRAND_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(brand)
    }
}
