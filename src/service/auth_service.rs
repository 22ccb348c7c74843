use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::crypto::CryptoService;
use crate::dto::{AuthResponseDto, UserDto};
use crate::error::{AppError, AppResult};
use crate::models::{Email, User};
use crate::repository::UserRepository;
use crate::service::jwt::{Claims, JwtService, TokenKind};

#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints and checks session tokens for users.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    crypto: CryptoService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtService>, crypto: CryptoService) -> Self {
        Self { users, jwt, crypto }
    }

    /// Completes signup for an address whose code was just verified: marks the
    /// user verified and issues a token pair.
    #[instrument(skip(self))]
    pub async fn verify_otp(&self, email: &Email) -> AppResult<AuthResponseDto> {
        let existing = self
            .users
            .find_by_email(email.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if existing.is_blocked {
            return Err(AppError::Forbidden("User is blocked".to_string()));
        }

        let user = self
            .users
            .mark_verified(email.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, "User verified");
        self.session_for(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &Email, password: &str) -> AppResult<AuthResponseDto> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .users
            .find_by_email(email.as_str())
            .await?
            .ok_or_else(invalid)?;
        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !self.crypto.verify_secret(password, hash)? {
            warn!(user_id = %user.id, "Wrong password");
            return Err(invalid());
        }
        if user.is_blocked {
            return Err(AppError::Forbidden("User is blocked".to_string()));
        }
        if !user.is_verified {
            return Err(AppError::Forbidden("Email is not verified".to_string()));
        }

        self.session_for(user)
    }

    /// Exchange a refresh token for a fresh token pair.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponseDto> {
        let claims = self
            .jwt
            .verify_token(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
        if user.is_blocked {
            return Err(AppError::Forbidden("User is blocked".to_string()));
        }

        self.session_for(user)
    }

    pub fn authenticate(&self, access_token: &str) -> AppResult<Claims> {
        self.jwt
            .verify_token(access_token, TokenKind::Access)
            .map_err(|_| AppError::Unauthorized("Invalid or expired access token".to_string()))
    }

    pub fn issue_tokens(&self, user: &User) -> AppResult<AuthTokens> {
        Ok(AuthTokens {
            access_token: self.jwt.create_token(user, TokenKind::Access)?,
            refresh_token: self.jwt.create_token(user, TokenKind::Refresh)?,
        })
    }

    fn session_for(&self, user: User) -> AppResult<AuthResponseDto> {
        let tokens = self.issue_tokens(&user)?;
        Ok(AuthResponseDto {
            user: UserDto::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, UserRole};
    use crate::repository::InMemoryUserRepository;

    async fn setup(verified: bool) -> (AuthService, Arc<InMemoryUserRepository>) {
        let crypto = CryptoService::with_cost(1024, 1);
        let users = Arc::new(InMemoryUserRepository::new());
        let mut user = User::new(NewUser {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password_hash: crypto.hash_secret("harvest-time").unwrap(),
            role: UserRole::User,
            phone: "+15555550101".to_string(),
        });
        user.is_verified = verified;
        users.insert(&user).await.unwrap();

        let jwt = Arc::new(JwtService::new("secret", "farmhub".to_string()));
        (AuthService::new(users.clone(), jwt, crypto), users)
    }

    #[tokio::test]
    async fn verify_otp_marks_user_verified_and_issues_tokens() {
        let (auth, users) = setup(false).await;
        let email = Email::parse("ravi@example.com").unwrap();

        let session = auth.verify_otp(&email).await.unwrap();
        assert!(session.user.is_verified);
        assert!(auth.authenticate(&session.access_token).is_ok());
        assert!(auth.authenticate(&session.refresh_token).is_err());
        assert!(users
            .find_by_email("ravi@example.com")
            .await
            .unwrap()
            .unwrap()
            .is_verified);
    }

    #[tokio::test]
    async fn verify_otp_for_unknown_user_is_not_found() {
        let (auth, _) = setup(false).await;
        let email = Email::parse("ghost@example.com").unwrap();
        assert!(matches!(
            auth.verify_otp(&email).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn login_requires_verified_account_and_right_password() {
        let (auth, _) = setup(false).await;
        let email = Email::parse("ravi@example.com").unwrap();
        assert!(matches!(
            auth.login(&email, "harvest-time").await,
            Err(AppError::Forbidden(_))
        ));

        let (auth, _) = setup(true).await;
        assert!(matches!(
            auth.login(&email, "wrong-password").await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(auth.login(&email, "harvest-time").await.is_ok());
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let (auth, _) = setup(true).await;
        let email = Email::parse("ravi@example.com").unwrap();
        let session = auth.login(&email, "harvest-time").await.unwrap();

        assert!(auth.refresh(&session.refresh_token).await.is_ok());
        assert!(matches!(
            auth.refresh(&session.access_token).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
