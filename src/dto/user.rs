use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CourseProgress, FarmerStatus, User, UserRole};

/// Public shape of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,

    pub is_farmer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_reg_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    pub expertise: Vec<String>,
    pub awards: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_status: Option<FarmerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub course_progress: Vec<CourseProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            is_verified: user.is_verified,
            is_admin: user.is_admin,
            is_blocked: user.is_blocked,
            google_id: user.google_id,
            is_farmer: user.is_farmer,
            farmer_reg_id: user.farmer_reg_id,
            experience: user.experience,
            qualification: user.qualification,
            expertise: user.expertise,
            awards: user.awards,
            farmer_status: user.farmer_status,
            profile: user.profile,
            bio: user.bio,
            course_progress: user.course_progress.0,
            reason: user.reason,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequestDto {
    #[validate(length(min = 3, max = 100, message = "Name must be 3 to 100 characters"))]
    pub name: String,
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Option<String>,
    #[validate(length(min = 7, max = 20, message = "Phone number is invalid"))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdateDto {
    pub user_id: Uuid,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequestDto {
    #[serde(deserialize_with = "super::trimmed")]
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequestDto {
    pub refresh_token: Option<String>,
}

/// Tokens plus the user they were minted for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}
