use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub member_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewCommunity {
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
}

impl Community {
    pub fn new(new_community: NewCommunity) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new_community.name,
            description: new_community.description,
            created_at: Utc::now(),
            created_by: new_community.created_by,
            member_count: 1,
            image_url: new_community.image_url,
            categories: new_community.categories,
        }
    }
}
