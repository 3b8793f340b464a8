use serde::Deserialize;

use crate::{
    models::PostStatus,
    validation::{FieldError, Validate},
};

fn default_status() -> String {
    PostStatus::PUBLISHED.to_string()
}

/// Request body for `POST /blog`; slug and published_at are derived.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    pub author_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }
}
