use async_trait::async_trait;
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{User, UserRole};

/// Insert hit the unique email index.
#[derive(Debug, Error)]
#[error("Email already exists")]
pub struct DuplicateEmail;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with a [`DuplicateEmail`] report when the address is taken.
    async fn insert(&self, user: &User) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Flip `is_verified` on, returning the updated user if one exists.
    async fn mark_verified(&self, email: &str) -> Result<Option<User>>;

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &User) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
                INSERT INTO users (
                    id,
                    name,
                    email,
                    password_hash,
                    role,
                    phone,
                    is_verified,
                    is_admin,
                    is_blocked,
                    is_farmer,
                    expertise,
                    awards,
                    course_progress,
                    created_at,
                    updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.phone)
        .bind(user.is_verified)
        .bind(user.is_admin)
        .bind(user.is_blocked)
        .bind(user.is_farmer)
        .bind(&user.expertise)
        .bind(&user.awards)
        .bind(&user.course_progress)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(err) => {
                if let sqlx::Error::Database(db_err) = &err {
                    if db_err.constraint() == Some("idx_users_email") {
                        return Err(DuplicateEmail.into());
                    }
                }
                Err(err).wrap_err("Failed to insert user")
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .wrap_err("Failed to fetch user")
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .wrap_err("Failed to fetch user")
    }

    async fn mark_verified(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
                UPDATE users
                SET is_verified = TRUE,
                    updated_at = NOW()
                WHERE email = $1
                RETURNING *
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to mark user verified")
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
                UPDATE users
                SET role = $2,
                    is_farmer = ($2 = 'farmer'::user_role),
                    is_admin = ($2 = 'admin'::user_role),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to update user role")
    }
}
