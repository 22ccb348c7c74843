use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Farmer,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::User => "user",
            UserRole::Farmer => "farmer",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "farmer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FarmerStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub phone: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub google_id: Option<String>,

    pub is_farmer: bool,
    pub farmer_reg_id: Option<String>,
    pub experience: Option<i32>,
    pub qualification: Option<String>,
    pub expertise: Vec<String>,
    pub awards: Vec<String>,
    pub farmer_status: Option<FarmerStatus>,
    pub profile: Option<String>,
    pub bio: Option<String>,
    pub course_progress: Json<Vec<CourseProgress>>,
    pub reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Fresh, unverified account. Farmer-specific fields start empty.
    pub fn new(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: Some(new_user.password_hash),
            is_farmer: new_user.role == UserRole::Farmer,
            is_admin: new_user.role == UserRole::Admin,
            role: new_user.role,
            phone: new_user.phone,
            is_verified: false,
            is_blocked: false,
            google_id: None,
            farmer_reg_id: None,
            experience: None,
            qualification: None,
            expertise: Vec::new(),
            awards: Vec::new(),
            farmer_status: None,
            profile: None,
            bio: None,
            course_progress: Json(Vec::new()),
            reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Insert payload; the password is already hashed by the time it gets here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: String,
}
