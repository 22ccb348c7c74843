use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::crypto::CryptoService;
use crate::dto::{RoleUpdateDto, SignupRequestDto, UserDto};
use crate::error::{AppError, AppResult};
use crate::models::{Email, NewUser, User, UserRole};
use crate::repository::{DuplicateEmail, UserRepository};

#[async_trait]
pub trait UserUseCase: Send + Sync {
    async fn signup(&self, dto: SignupRequestDto) -> AppResult<UserDto>;
    async fn get_user(&self, id: Uuid) -> AppResult<UserDto>;
    async fn set_role(&self, dto: RoleUpdateDto) -> AppResult<RoleUpdateDto>;
}

pub struct UserInteractor {
    users: Arc<dyn UserRepository>,
    crypto: CryptoService,
}

impl UserInteractor {
    pub fn new(users: Arc<dyn UserRepository>, crypto: CryptoService) -> Self {
        Self { users, crypto }
    }
}

/// Only plain users and farmers may be chosen at signup.
fn signup_role(role: Option<&str>) -> AppResult<UserRole> {
    match role.map(|r| r.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("user") => Ok(UserRole::User),
        Some("farmer") => Ok(UserRole::Farmer),
        Some(other) => Err(AppError::BadRequest(format!("Role '{other}' cannot be chosen at signup"))),
    }
}

#[async_trait]
impl UserUseCase for UserInteractor {
    #[instrument(skip(self, dto), fields(email = %dto.email))]
    async fn signup(&self, dto: SignupRequestDto) -> AppResult<UserDto> {
        let email = Email::parse(&dto.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let role = signup_role(dto.role.as_deref())?;

        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.crypto.hash_secret(&dto.password)?;
        let user = User::new(NewUser {
            name: dto.name.trim().to_string(),
            email: email.as_str().to_string(),
            password_hash,
            role,
            phone: dto.phone.trim().to_string(),
        });
        // A concurrent signup can still win the unique index after the check above.
        let user = match self.users.insert(&user).await {
            Ok(user) => user,
            Err(err) if err.is::<DuplicateEmail>() => {
                return Err(AppError::Conflict("User already exists".to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        info!(user_id = %user.id, "User signed up");
        Ok(UserDto::from(user))
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserDto> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self))]
    async fn set_role(&self, dto: RoleUpdateDto) -> AppResult<RoleUpdateDto> {
        let user = self
            .users
            .set_role(dto.user_id, dto.role)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, role = user.role.to_str(), "Role updated");
        Ok(RoleUpdateDto {
            user_id: user.id,
            role: user.role,
        })
    }
}
