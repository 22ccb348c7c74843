pub mod community_controller;
pub mod health_controller;
pub mod otp_controller;
pub mod user_controller;

use actix_web::cookie::{Cookie, SameSite};
use time::Duration;

pub use community_controller::CommunityController;
pub use otp_controller::OtpController;
pub use user_controller::UserController;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Flags for the session cookies. Production serves cross-site over TLS, so
/// cookies there are `Secure; SameSite=None`; elsewhere `SameSite=Lax`.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieSettings {
    pub fn for_environment(production: bool) -> Self {
        if production {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Lax,
            }
        }
    }

    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        self.build(ACCESS_TOKEN_COOKIE, token, Duration::hours(1))
    }

    pub fn refresh_cookie(&self, token: String) -> Cookie<'static> {
        self.build(REFRESH_TOKEN_COOKIE, token, Duration::days(30))
    }

    /// Same cookie with an empty value and zero max-age, telling the client to drop it.
    pub fn expired(&self, name: &'static str) -> Cookie<'static> {
        self.build(name, String::new(), Duration::ZERO)
    }

    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build(name, value)
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age)
            .path("/")
            .finish()
    }
}
