use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use color_eyre::Result;
use rand::Rng;
use rand_core::OsRng;
use tracing::instrument;

/// Argon2id hashing for passwords and one-time codes, plus OTP generation.
#[derive(Debug, Clone, Copy)]
pub struct CryptoService {
    memory_kib: u32,
    iterations: u32,
}

impl Default for CryptoService {
    fn default() -> Self {
        Self {
            memory_kib: 32_768, // 32 MB
            iterations: 3,
        }
    }
}

impl CryptoService {
    /// Cheaper parameters, used where hashing speed matters more than cost (tests, seeding).
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Self {
        Self {
            memory_kib,
            iterations,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|e| eyre::eyre!("Failed to create Argon2 params: {e}"))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    #[instrument(skip(self, secret))]
    pub fn hash_secret(&self, secret: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.argon2()?;

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| eyre::eyre!("Failed to hash secret: {e}"))?
            .to_string();

        Ok(hash)
    }

    #[instrument(skip(self, secret, hash))]
    pub fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| eyre::eyre!("Invalid hash format: {e}"))?;

        let argon2 = self.argon2()?;

        match argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(eyre::eyre!("Secret verification failed: {e}")),
        }
    }

    /// Random numeric code of exactly `length` digits (no leading zero).
    pub fn generate_otp_code(&self, length: u32) -> Result<String> {
        if !(4..=12).contains(&length) {
            return Err(eyre::eyre!("OTP length must be between 4 and 12, got {length}"));
        }
        let low = 10u64.pow(length - 1);
        let high = 10u64.pow(length) - 1;
        let code = rand::thread_rng().gen_range(low..=high);
        Ok(code.to_string())
    }
}
