use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};
use tracing::{info, instrument};

use super::CookieSettings;
use crate::dto::{MessageResponse, OtpRequestDto};
use crate::error::{AppError, AppResult};
use crate::middleware::ValidatedJson;
use crate::models::Email;
use crate::service::{AuthService, EmailSender};
use crate::use_cases::{GenerateOtpUseCase, VerifyOtpUseCase};

/// HTTP orchestration for OTP issuance and verification. Every collaborator
/// is passed in at construction.
pub struct OtpController {
    generate_otp: Arc<GenerateOtpUseCase>,
    verify_otp: Arc<VerifyOtpUseCase>,
    email_service: Arc<dyn EmailSender>,
    auth_service: Arc<AuthService>,
    cookies: CookieSettings,
}

impl OtpController {
    pub fn new(
        generate_otp: Arc<GenerateOtpUseCase>,
        verify_otp: Arc<VerifyOtpUseCase>,
        email_service: Arc<dyn EmailSender>,
        auth_service: Arc<AuthService>,
        cookies: CookieSettings,
    ) -> Self {
        Self {
            generate_otp,
            verify_otp,
            email_service,
            auth_service,
            cookies,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn generate_otp_handler(&self, request: OtpRequestDto) -> AppResult<HttpResponse> {
        let Some(email) = request.email() else {
            return Err(AppError::BadRequest("Email address is required".to_string()));
        };
        let email = Email::parse(email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.issue_and_send(&email).await?;
        Ok(HttpResponse::Ok().json(MessageResponse::ok("OTP generated successfully.")))
    }

    #[instrument(skip(self, request))]
    pub async fn resend_otp_handler(&self, request: OtpRequestDto) -> AppResult<HttpResponse> {
        let Some(email) = request.email() else {
            return Err(AppError::BadRequest("Email is required".to_string()));
        };
        let email = Email::parse(email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.issue_and_send(&email).await?;
        Ok(HttpResponse::Ok().json(MessageResponse::ok("OTP resent successfully.")))
    }

    /// Signup completion: a valid code verifies the account and opens a session.
    /// Nothing is minted unless the code checks out.
    #[instrument(skip(self, request))]
    pub async fn verify_otp_handler(&self, request: OtpRequestDto) -> AppResult<HttpResponse> {
        let (Some(email), Some(_)) = (request.email(), request.otp()) else {
            return Err(AppError::BadRequest("Email and OTP are required".to_string()));
        };
        let email = Email::parse(email).map_err(|e| AppError::BadRequest(e.to_string()))?;

        if !self.verify_otp.execute(request).await? {
            return Err(AppError::BadRequest("Invalid or expired OTP".to_string()));
        }

        let session = self.auth_service.verify_otp(&email).await?;
        info!(user_id = %session.user.id, "Signup verified, session issued");

        Ok(HttpResponse::Ok()
            .cookie(self.cookies.refresh_cookie(session.refresh_token.clone()))
            .cookie(self.cookies.access_cookie(session.access_token.clone()))
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", session.access_token),
            ))
            .json(session))
    }

    /// Re-verification of an address from the profile screen; no session is issued.
    #[instrument(skip(self, request))]
    pub async fn profile_verify_otp_handler(
        &self,
        request: OtpRequestDto,
    ) -> AppResult<HttpResponse> {
        if request.email().is_none() || request.otp().is_none() {
            return Err(AppError::BadRequest("Email or Otp is invalid".to_string()));
        }

        if !self.verify_otp.execute(request).await? {
            return Err(AppError::BadRequest("Entered a wrong otp".to_string()));
        }

        Ok(HttpResponse::Ok().json(MessageResponse::ok("Email verification successful")))
    }

    async fn issue_and_send(&self, email: &Email) -> AppResult<()> {
        let otp_response = self
            .generate_otp
            .execute(OtpRequestDto::for_email(email.as_str()))
            .await?;
        if otp_response.otp.is_empty() {
            return Err(eyre::eyre!("OTP was not generated").into());
        }
        self.email_service
            .send_otp_email(email.as_str(), &otp_response.otp)
            .await?;
        Ok(())
    }
}

pub async fn generate_otp(
    controller: web::Data<OtpController>,
    body: ValidatedJson<OtpRequestDto>,
) -> AppResult<HttpResponse> {
    controller.generate_otp_handler(body.into_inner()).await
}

pub async fn resend_otp(
    controller: web::Data<OtpController>,
    body: ValidatedJson<OtpRequestDto>,
) -> AppResult<HttpResponse> {
    controller.resend_otp_handler(body.into_inner()).await
}

pub async fn verify_otp(
    controller: web::Data<OtpController>,
    body: ValidatedJson<OtpRequestDto>,
) -> AppResult<HttpResponse> {
    controller.verify_otp_handler(body.into_inner()).await
}

pub async fn profile_verify_otp(
    controller: web::Data<OtpController>,
    body: ValidatedJson<OtpRequestDto>,
) -> AppResult<HttpResponse> {
    controller.profile_verify_otp_handler(body.into_inner()).await
}
