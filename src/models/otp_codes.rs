use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One row per email; `code` holds the argon2 hash of the issued code.
#[derive(Debug, Clone, FromRow)]
pub struct OtpCode {
    pub email: String,
    pub code: String,
    pub attempts: i32,
    pub consumed: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OtpCode {
    pub fn new(email: String, code_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            email,
            code: code_hash,
            attempts: 0,
            consumed: false,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_locked(&self, max_attempts: i32) -> bool {
        self.attempts >= max_attempts
    }
}
