pub mod community;
pub mod otp;
pub mod user;

use serde::{Deserialize, Deserializer, Serialize};

pub use community::{CreateCommunityDto, UpdateCommunityDto};
pub use otp::{OtpRequestDto, OtpResponseDto};
pub use user::{
    AuthResponseDto, LoginRequestDto, RefreshTokenRequestDto, RoleUpdateDto, SignupRequestDto,
    UserDto,
};

/// `{ message, success }` envelope used by every non-data response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

/// String with surrounding whitespace removed, so padded input passes format checks.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// Like [`trimmed`], with blank values treated as absent. Pair with `#[serde(default)]`.
pub(crate) fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|value| value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
/// Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
