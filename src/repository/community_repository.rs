use async_trait::async_trait;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::UpdateCommunityDto;
use crate::models::Community;

#[async_trait]
pub trait CommunityRepository: Send + Sync {
    async fn insert(&self, community: &Community) -> Result<Community>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Community>>;

    async fn find(&self, id: Uuid) -> Result<Option<Community>>;

    async fn update(&self, id: Uuid, changes: &UpdateCommunityDto) -> Result<Option<Community>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommunityRepository for PgCommunityRepository {
    async fn insert(&self, community: &Community) -> Result<Community> {
        sqlx::query_as::<_, Community>(
            r#"
                INSERT INTO communities (
                    id,
                    name,
                    description,
                    created_at,
                    created_by,
                    member_count,
                    image_url,
                    categories
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            "#,
        )
        .bind(community.id)
        .bind(&community.name)
        .bind(&community.description)
        .bind(community.created_at)
        .bind(&community.created_by)
        .bind(community.member_count)
        .bind(&community.image_url)
        .bind(&community.categories)
        .fetch_one(&self.pool)
        .await
        .wrap_err("Failed to insert community")
    }

    async fn list(&self) -> Result<Vec<Community>> {
        sqlx::query_as::<_, Community>("SELECT * FROM communities ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .wrap_err("Failed to list communities")
    }

    async fn find(&self, id: Uuid) -> Result<Option<Community>> {
        sqlx::query_as::<_, Community>("SELECT * FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .wrap_err("Failed to fetch community")
    }

    async fn update(&self, id: Uuid, changes: &UpdateCommunityDto) -> Result<Option<Community>> {
        sqlx::query_as::<_, Community>(
            r#"
                UPDATE communities
                SET name = COALESCE($2, name),
                    description = COALESCE($3, description),
                    image_url = CASE WHEN $4 THEN $5 ELSE image_url END,
                    categories = COALESCE($6, categories)
                WHERE id = $1
                RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.image_url.is_some())
        .bind(changes.image_url.clone().flatten())
        .bind(&changes.categories)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to update community")
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .wrap_err("Failed to delete community")?;

        Ok(result.rows_affected() > 0)
    }
}
