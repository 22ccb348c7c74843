//! Shared wiring for the HTTP tests: the real controllers and use-cases over
//! in-memory repositories, with outgoing email captured instead of sent.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{
    body::BoxBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    App, Error,
};
use async_trait::async_trait;

use farmhub::config::{routes, CryptoService};
use farmhub::controllers::CookieSettings;
use farmhub::models::{NewUser, User, UserRole};
use farmhub::service::{EmailSender, JwtService, TokenKind};
use farmhub::use_cases::OtpPolicy;
use farmhub::{AppServices, Dependencies, Repositories};

/// Captures every OTP email instead of delivering it.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_otp_email(&self, to: &str, otp: &str) -> color_eyre::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), otp.to_string()));
        Ok(())
    }
}

/// Simulates the mail provider being down.
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send_otp_email(&self, _to: &str, _otp: &str) -> color_eyre::Result<()> {
        Err(eyre::eyre!("SMTP relay unavailable"))
    }
}

pub struct TestContext {
    pub services: AppServices,
    pub repositories: Repositories,
    pub emails: Arc<RecordingEmailSender>,
    pub jwt: Arc<JwtService>,
    pub crypto: CryptoService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::build(false, None)
    }

    pub fn production() -> Self {
        Self::build(true, None)
    }

    pub fn with_email_sender(sender: Arc<dyn EmailSender>) -> Self {
        Self::build(false, Some(sender))
    }

    fn build(production: bool, sender: Option<Arc<dyn EmailSender>>) -> Self {
        let repositories = Repositories::in_memory();
        let emails = Arc::new(RecordingEmailSender::default());
        let jwt = Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string()));
        let crypto = CryptoService::with_cost(1024, 1);

        let services = AppServices::new(Dependencies {
            repositories: repositories.clone(),
            email_sender: sender.unwrap_or_else(|| emails.clone() as Arc<dyn EmailSender>),
            jwt: jwt.clone(),
            crypto,
            otp_policy: OtpPolicy::default(),
            cookies: CookieSettings::for_environment(production),
        });

        Self {
            services,
            repositories,
            emails,
            jwt,
            crypto,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = Error,
            InitError = (),
        >,
    > {
        let services = self.services.clone();
        App::new()
            .configure(move |cfg| services.configure(cfg))
            .configure(routes)
    }

    /// Store a user directly, bypassing signup.
    pub async fn seed_user(&self, email: &str, role: UserRole, verified: bool) -> User {
        let mut user = User::new(NewUser {
            name: "Test Grower".to_string(),
            email: email.to_string(),
            password_hash: self.crypto.hash_secret("correct-horse").unwrap(),
            role,
            phone: "+15555550199".to_string(),
        });
        user.is_verified = verified;
        self.repositories.users.insert(&user).await.unwrap()
    }

    pub fn access_token(&self, user: &User) -> String {
        self.jwt.create_token(user, TokenKind::Access).unwrap()
    }

    pub fn refresh_token(&self, user: &User) -> String {
        self.jwt.create_token(user, TokenKind::Refresh).unwrap()
    }
}
