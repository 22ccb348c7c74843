use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use tracing::debug;

use crate::controllers::ACCESS_TOKEN_COOKIE;
use crate::error::AppError;
use crate::service::{Claims, JwtService, TokenKind};

/// Authenticated caller, taken from the `accessToken` cookie or an
/// `Authorization: Bearer` header. Rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.0.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_auth_user(req))
    }
}

fn extract_auth_user(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let jwt = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::Internal(eyre::eyre!("JwtService is not registered")))?;

    let token = token_from_request(req)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = jwt.verify_token(&token, TokenKind::Access).map_err(|e| {
        debug!("Rejected access token: {e}");
        AppError::Unauthorized("Invalid or expired access token".to_string())
    })?;

    Ok(AuthUser(claims))
}

/// Cookie first, then the Authorization header (with or without `Bearer `).
fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    let auth_str = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    use crate::models::{NewUser, User, UserRole};

    fn jwt() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    fn token(jwt: &JwtService, kind: TokenKind) -> (User, String) {
        let user = User::new(NewUser {
            name: "Kiran".to_string(),
            email: "kiran@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            phone: "+15555550103".to_string(),
        });
        let token = jwt.create_token(&user, kind).unwrap();
        (user, token)
    }

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt = jwt();
        let (user, token) = token(&jwt, TokenKind::Access);
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        let auth = extract_auth_user(&req).unwrap();
        assert_eq!(auth.claims().user_id, user.id);
        assert!(auth.require_admin().is_err());
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let jwt = jwt();
        let (user, token) = token(&jwt, TokenKind::Access);
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt))
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, token))
            .to_http_request();

        assert_eq!(extract_auth_user(&req).unwrap().claims().user_id, user.id);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let jwt = jwt();
        let (_, token) = token(&jwt, TokenKind::Refresh);
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        assert!(matches!(
            extract_auth_user(&req),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_no_credentials() {
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt()))
            .to_http_request();

        assert!(matches!(
            extract_auth_user(&req),
            Err(AppError::Unauthorized(_))
        ));
    }
}
