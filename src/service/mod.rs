pub mod auth_service;
pub mod email_service;
pub mod jwt;

pub use auth_service::{AuthService, AuthTokens};
pub use email_service::{EmailSender, SmtpEmailService};
pub use jwt::{Claims, JwtService, TokenKind};
