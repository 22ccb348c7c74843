use std::sync::Arc;

use actix_web::web;
use sqlx::PgPool;

use crate::config::crypto::CryptoService;
use crate::controllers::{CommunityController, CookieSettings, OtpController, UserController};
use crate::repository::{
    CommunityRepository, InMemoryCommunityRepository, InMemoryOtpStore, InMemoryUserRepository,
    OtpStore, PgCommunityRepository, PgOtpStore, PgUserRepository, UserRepository,
};
use crate::service::{AuthService, EmailSender, JwtService};
use crate::use_cases::{
    CommunityUseCase, GenerateOtpUseCase, OtpPolicy, UserInteractor, VerifyOtpUseCase,
};

#[derive(Clone)]
pub struct Repositories {
    pub otp: Arc<dyn OtpStore>,
    pub users: Arc<dyn UserRepository>,
    pub communities: Arc<dyn CommunityRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            otp: Arc::new(PgOtpStore::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            communities: Arc::new(PgCommunityRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            otp: Arc::new(InMemoryOtpStore::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            communities: Arc::new(InMemoryCommunityRepository::new()),
        }
    }
}

/// Everything the services need, gathered in one place so `main` and the
/// tests wire the application the same way.
pub struct Dependencies {
    pub repositories: Repositories,
    pub email_sender: Arc<dyn EmailSender>,
    pub jwt: Arc<JwtService>,
    pub crypto: CryptoService,
    pub otp_policy: OtpPolicy,
    pub cookies: CookieSettings,
}

/// Controllers shared across actix workers.
#[derive(Clone)]
pub struct AppServices {
    pub otp_controller: web::Data<OtpController>,
    pub user_controller: web::Data<UserController>,
    pub community_controller: web::Data<CommunityController>,
    pub jwt: web::Data<JwtService>,
}

impl AppServices {
    pub fn new(deps: Dependencies) -> Self {
        let Dependencies {
            repositories,
            email_sender,
            jwt,
            crypto,
            otp_policy,
            cookies,
        } = deps;

        let auth_service = Arc::new(AuthService::new(
            repositories.users.clone(),
            jwt.clone(),
            crypto,
        ));
        let generate_otp = Arc::new(GenerateOtpUseCase::new(
            repositories.otp.clone(),
            crypto,
            otp_policy,
        ));
        let verify_otp = Arc::new(VerifyOtpUseCase::new(
            repositories.otp.clone(),
            crypto,
            otp_policy,
        ));
        let users = Arc::new(UserInteractor::new(repositories.users.clone(), crypto));
        let communities = Arc::new(CommunityUseCase::new(repositories.communities.clone()));

        Self {
            otp_controller: web::Data::new(OtpController::new(
                generate_otp,
                verify_otp,
                email_sender,
                auth_service.clone(),
                cookies,
            )),
            user_controller: web::Data::new(UserController::new(users, auth_service, cookies)),
            community_controller: web::Data::new(CommunityController::new(communities)),
            jwt: web::Data::from(jwt),
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.otp_controller.clone())
            .app_data(self.user_controller.clone())
            .app_data(self.community_controller.clone())
            .app_data(self.jwt.clone());
    }
}
