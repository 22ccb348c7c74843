pub mod auth;
pub mod validation;

pub use auth::AuthUser;
pub use validation::{FieldError, ValidatedJson, ValidationFailure};
