use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use super::{CookieSettings, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::dto::{
    AuthResponseDto, LoginRequestDto, MessageResponse, RefreshTokenRequestDto, RoleUpdateDto,
    SignupRequestDto,
};
use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::Email;
use crate::service::AuthService;
use crate::use_cases::UserUseCase;

pub struct UserController {
    user_use_case: Arc<dyn UserUseCase>,
    auth_service: Arc<AuthService>,
    cookies: CookieSettings,
}

impl UserController {
    pub fn new(
        user_use_case: Arc<dyn UserUseCase>,
        auth_service: Arc<AuthService>,
        cookies: CookieSettings,
    ) -> Self {
        Self {
            user_use_case,
            auth_service,
            cookies,
        }
    }

    pub async fn signup(&self, request: SignupRequestDto) -> AppResult<HttpResponse> {
        let user = self.user_use_case.signup(request).await?;
        Ok(HttpResponse::Created().json(user))
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<HttpResponse> {
        let user = self.user_use_case.get_user(id).await?;
        Ok(HttpResponse::Ok().json(user))
    }

    pub async fn set_role(&self, caller: &AuthUser, request: RoleUpdateDto) -> AppResult<HttpResponse> {
        caller.require_admin()?;
        let updated = self.user_use_case.set_role(request).await?;
        Ok(HttpResponse::Ok().json(updated))
    }

    pub async fn login(&self, request: LoginRequestDto) -> AppResult<HttpResponse> {
        let email = Email::parse(&request.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let session = self.auth_service.login(&email, &request.password).await?;
        Ok(self.session_response(session))
    }

    /// The refresh token comes from the `refreshToken` cookie, or the body for
    /// clients that cannot hold cookies.
    pub async fn refresh_token(
        &self,
        req: &HttpRequest,
        request: RefreshTokenRequestDto,
    ) -> AppResult<HttpResponse> {
        let token = req
            .cookie(REFRESH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .or(request.refresh_token)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Unauthorized("Refresh token is required".to_string()))?;

        let session = self.auth_service.refresh(&token).await?;
        Ok(self.session_response(session))
    }

    pub fn logout(&self) -> HttpResponse {
        HttpResponse::Ok()
            .cookie(self.cookies.expired(ACCESS_TOKEN_COOKIE))
            .cookie(self.cookies.expired(REFRESH_TOKEN_COOKIE))
            .json(MessageResponse::ok("Logged out"))
    }

    fn session_response(&self, session: AuthResponseDto) -> HttpResponse {
        HttpResponse::Ok()
            .cookie(self.cookies.refresh_cookie(session.refresh_token.clone()))
            .cookie(self.cookies.access_cookie(session.access_token.clone()))
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", session.access_token),
            ))
            .json(session)
    }
}

pub async fn signup(
    controller: web::Data<UserController>,
    body: ValidatedJson<SignupRequestDto>,
) -> AppResult<HttpResponse> {
    controller.signup(body.into_inner()).await
}

pub async fn me(controller: web::Data<UserController>, caller: AuthUser) -> AppResult<HttpResponse> {
    controller.get_user(caller.claims().user_id).await
}

pub async fn get_user(
    controller: web::Data<UserController>,
    _caller: AuthUser,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    controller.get_user(path.into_inner()).await
}

pub async fn set_role(
    controller: web::Data<UserController>,
    caller: AuthUser,
    body: ValidatedJson<RoleUpdateDto>,
) -> AppResult<HttpResponse> {
    controller.set_role(&caller, body.into_inner()).await
}

pub async fn login(
    controller: web::Data<UserController>,
    body: ValidatedJson<LoginRequestDto>,
) -> AppResult<HttpResponse> {
    controller.login(body.into_inner()).await
}

pub async fn refresh_token(
    controller: web::Data<UserController>,
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequestDto>>,
) -> AppResult<HttpResponse> {
    let request = body.map(|b| b.into_inner()).unwrap_or_default();
    controller.refresh_token(&req, request).await
}

pub async fn logout(controller: web::Data<UserController>) -> HttpResponse {
    controller.logout()
}
