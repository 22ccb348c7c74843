use std::sync::Arc;

use chrono::Utc;
use eyre::{Result, WrapErr};
use tracing::{info, instrument};

use super::OtpPolicy;
use crate::config::crypto::CryptoService;
use crate::dto::{OtpRequestDto, OtpResponseDto};
use crate::models::{Email, OtpCode};
use crate::repository::OtpStore;

/// Issues a fresh code for an email and persists its hash. Delivery is the
/// caller's job.
pub struct GenerateOtpUseCase {
    store: Arc<dyn OtpStore>,
    crypto: CryptoService,
    policy: OtpPolicy,
}

impl GenerateOtpUseCase {
    pub fn new(store: Arc<dyn OtpStore>, crypto: CryptoService, policy: OtpPolicy) -> Self {
        Self {
            store,
            crypto,
            policy,
        }
    }

    #[instrument(skip(self, request), fields(email = ?request.email))]
    pub async fn execute(&self, request: OtpRequestDto) -> Result<OtpResponseDto> {
        let email = Email::parse(request.email().unwrap_or_default())?;

        let otp = self.crypto.generate_otp_code(self.policy.code_length)?;
        let hashed = self.crypto.hash_secret(&otp).wrap_err("Failed to hash OTP")?;

        let record = OtpCode::new(
            email.as_str().to_string(),
            hashed,
            Utc::now() + self.policy.ttl,
        );
        self.store.upsert(&record).await?;

        info!(email = %email, "OTP generated");
        Ok(OtpResponseDto { otp })
    }
}
