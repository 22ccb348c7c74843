use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityDto {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
    #[validate(url(message = "Image URL is invalid"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Partial update; absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommunityDto {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Description cannot be empty"))]
    pub description: Option<String>,
    /// `null` clears the image; omitting the field keeps it.
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(url(message = "Image URL is invalid"))]
    pub image_url: Option<Option<String>>,
    pub categories: Option<Vec<String>>,
}
