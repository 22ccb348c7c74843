use std::sync::Arc;

use chrono::Utc;
use eyre::Result;
use tracing::{info, instrument, warn};

use super::OtpPolicy;
use crate::config::crypto::CryptoService;
use crate::dto::OtpRequestDto;
use crate::models::Email;
use crate::repository::OtpStore;

/// Checks a submitted code against the stored one and consumes it on a match.
///
/// Returns `Ok(false)` for a missing, consumed, expired, or locked record and
/// for a wrong code. A record that has absorbed `max_attempts` wrong guesses is
/// deleted, so the user has to request a new code.
pub struct VerifyOtpUseCase {
    store: Arc<dyn OtpStore>,
    crypto: CryptoService,
    policy: OtpPolicy,
}

impl VerifyOtpUseCase {
    pub fn new(store: Arc<dyn OtpStore>, crypto: CryptoService, policy: OtpPolicy) -> Self {
        Self {
            store,
            crypto,
            policy,
        }
    }

    #[instrument(skip(self, request), fields(email = ?request.email))]
    pub async fn execute(&self, request: OtpRequestDto) -> Result<bool> {
        let (Some(raw_email), Some(otp)) = (request.email(), request.otp()) else {
            return Ok(false);
        };
        let Ok(email) = Email::parse(raw_email) else {
            return Ok(false);
        };
        let email = email.as_str();

        let Some(record) = self.store.find(email).await? else {
            return Ok(false);
        };
        if record.consumed {
            return Ok(false);
        }
        if record.is_expired(Utc::now()) {
            self.store.delete(email, &record.code).await?;
            return Ok(false);
        }
        if record.is_locked(self.policy.max_attempts) {
            warn!(email, "OTP locked after too many failed attempts");
            self.store.delete(email, &record.code).await?;
            return Ok(false);
        }

        if !self.crypto.verify_secret(otp, &record.code)? {
            let attempts = self
                .store
                .record_failed_attempt(email, &record.code)
                .await?;
            warn!(email, attempts, "Wrong OTP submitted");
            if attempts >= self.policy.max_attempts {
                self.store.delete(email, &record.code).await?;
            }
            return Ok(false);
        }

        let consumed = self.store.consume(email, &record.code).await?;
        if consumed {
            info!(email, "OTP verified");
        }
        Ok(consumed)
    }
}
