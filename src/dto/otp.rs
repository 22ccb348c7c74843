use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of every OTP endpoint. Presence is checked by the controller so each
/// route can answer with its own message; format is checked up front.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OtpRequestDto {
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::trimmed_opt")]
    #[validate(length(min = 4, max = 12, message = "OTP must be 4 to 12 digits"))]
    pub otp: Option<String>,
}

impl OtpRequestDto {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            otp: None,
        }
    }

    pub fn with_otp(email: impl Into<String>, otp: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            otp: Some(otp.into()),
        }
    }

    /// Email with surrounding whitespace removed, `None` when absent or blank.
    pub fn email(&self) -> Option<&str> {
        present(self.email.as_deref())
    }

    pub fn otp(&self) -> Option<&str> {
        present(self.otp.as_deref())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpResponseDto {
    pub otp: String,
}
