use std::time::Duration;

use color_eyre::Result;
use dotenv::dotenv;
use eyre::WrapErr;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::use_cases::OtpPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub environment: String,
    pub platform_name: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub smtp_host: String,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub otp_template_path: String,
    pub otp_ttl_seconds: i64,
    pub otp_max_attempts: i32,
    pub otp_length: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        info!("Initializing configuration");
        let env = ::config::Config::builder()
            .add_source(::config::Environment::default().try_parsing(true))
            .build()
            .wrap_err("Building configuration")?;

        // MONGO_URI and NODE_ENV are still honoured for older deployments.
        let database_url = env
            .get_string("database_url")
            .or_else(|_| env.get_string("mongo_uri"))
            .wrap_err("DATABASE_URL (or MONGO_URI) is not defined in the environment")?;
        let environment = env
            .get_string("environment")
            .or_else(|_| env.get_string("node_env"))
            .unwrap_or_else(|_| "development".to_string());

        let settings = ::config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("platform_name", "FarmHub")?
            .set_default("jwt_issuer", "farmhub")?
            .set_default("smtp_host", "localhost")?
            .set_default("smtp_user", "no-reply@farmhub.local")?
            .set_default("smtp_pass", "")?
            .set_default("otp_template_path", "./templates/otp_email.html")?
            .set_default("otp_ttl_seconds", 300)?
            .set_default("otp_max_attempts", 5)?
            .set_default("otp_length", 6)?
            .add_source(env)
            .set_override("database_url", database_url)?
            .set_override("environment", environment)?
            .build()
            .wrap_err("Building configuration")?;

        let config: Config = settings
            .try_deserialize()
            .wrap_err("loading configuration from environment")?;
        config.check_otp_settings()?;
        Ok(config)
    }

    /// Reject OTP settings that would make every code unusable.
    pub fn check_otp_settings(&self) -> Result<()> {
        if self.otp_ttl_seconds <= 0 {
            eyre::bail!("OTP_TTL_SECONDS must be positive, got {}", self.otp_ttl_seconds);
        }
        if self.otp_max_attempts < 1 {
            eyre::bail!("OTP_MAX_ATTEMPTS must be at least 1, got {}", self.otp_max_attempts);
        }
        if !(4..=12).contains(&self.otp_length) {
            eyre::bail!("OTP_LENGTH must be between 4 and 12, got {}", self.otp_length);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn otp_policy(&self) -> OtpPolicy {
        OtpPolicy {
            ttl: chrono::Duration::seconds(self.otp_ttl_seconds),
            max_attempts: self.otp_max_attempts,
            code_length: self.otp_length,
        }
    }

    pub async fn db_pool(&self) -> Result<PgPool> {
        info!("Initializing database pool");
        PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&self.database_url)
            .await
            .wrap_err("Creating database pool")
    }
}
