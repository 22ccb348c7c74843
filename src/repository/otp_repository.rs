use async_trait::async_trait;
use eyre::{Result, WrapErr};
use sqlx::PgPool;

use crate::models::OtpCode;

/// Persistence port for one-time codes, keyed by normalised email.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Insert or overwrite the record for `record.email` (last write wins).
    async fn upsert(&self, record: &OtpCode) -> Result<()>;

    async fn find(&self, email: &str) -> Result<Option<OtpCode>>;

    // The operations below take the `code` hash that was checked and only touch
    // the record while it still holds that hash. A record reissued in between
    // is left alone.

    /// Bump the failed-attempt counter, returning the new count (0 if the
    /// record is gone or was reissued).
    async fn record_failed_attempt(&self, email: &str, code: &str) -> Result<i32>;

    /// Mark the record consumed. Returns false if it was missing, reissued, or
    /// already consumed.
    async fn consume(&self, email: &str, code: &str) -> Result<bool>;

    async fn delete(&self, email: &str, code: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct PgOtpStore {
    pool: PgPool,
}

impl PgOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpStore for PgOtpStore {
    async fn upsert(&self, record: &OtpCode) -> Result<()> {
        sqlx::query(
            r#"
                INSERT INTO otp_codes (
                    email,
                    code,
                    attempts,
                    consumed,
                    expires_at,
                    created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (email)
                DO UPDATE SET
                    code = EXCLUDED.code,
                    attempts = EXCLUDED.attempts,
                    consumed = EXCLUDED.consumed,
                    expires_at = EXCLUDED.expires_at,
                    created_at = EXCLUDED.created_at
            "#,
        )
        .bind(&record.email)
        .bind(&record.code)
        .bind(record.attempts)
        .bind(record.consumed)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .wrap_err("Failed to store OTP")?;

        Ok(())
    }

    async fn find(&self, email: &str) -> Result<Option<OtpCode>> {
        sqlx::query_as::<_, OtpCode>("SELECT * FROM otp_codes WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .wrap_err("Failed to fetch OTP record")
    }

    async fn record_failed_attempt(&self, email: &str, code: &str) -> Result<i32> {
        let attempts: Option<i32> = sqlx::query_scalar(
            r#"
                UPDATE otp_codes
                SET attempts = attempts + 1
                WHERE email = $1 AND code = $2
                RETURNING attempts
            "#,
        )
        .bind(email)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to record OTP attempt")?;

        Ok(attempts.unwrap_or(0))
    }

    async fn consume(&self, email: &str, code: &str) -> Result<bool> {
        // Conditional update so two concurrent verifies cannot both win.
        let result = sqlx::query(
            r#"
                UPDATE otp_codes
                SET consumed = TRUE
                WHERE email = $1 AND code = $2 AND consumed = FALSE
            "#,
        )
        .bind(email)
        .bind(code)
        .execute(&self.pool)
        .await
        .wrap_err("Failed to consume OTP")?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, email: &str, code: &str) -> Result<()> {
        sqlx::query("DELETE FROM otp_codes WHERE email = $1 AND code = $2")
            .bind(email)
            .bind(code)
            .execute(&self.pool)
            .await
            .wrap_err("Failed to delete OTP")?;

        Ok(())
    }
}
