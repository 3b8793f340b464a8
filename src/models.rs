//! Record shapes persisted in the document store, one collection each.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::{
    store::Record,
    validation::{check_email, FieldError, Validate},
};

fn default_true() -> bool {
    true
}

fn default_status() -> String {
    PostStatus::PUBLISHED.to_string()
}

fn optional_string(description: &str) -> Value {
    json!({
        "anyOf": [{ "type": "string" }, { "type": "null" }],
        "default": null,
        "description": description,
    })
}

/// Stored account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Validate for User {
    fn validate(&self) -> Result<(), FieldError> {
        check_email("email", &self.email)?;
        if self.password_hash.is_empty() {
            return Err(FieldError::new("password_hash", "must not be empty"));
        }
        Ok(())
    }
}

impl Record for User {
    const COLLECTION: &'static str = "user";
}

impl User {
    pub fn json_schema() -> Value {
        json!({
            "title": "User",
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Full name" },
                "email": { "type": "string", "format": "email", "description": "Email address" },
                "password_hash": { "type": "string", "description": "Hashed password" },
                "avatar_url": optional_string("Avatar image URL"),
                "is_active": { "type": "boolean", "default": true, "description": "Whether user is active" },
            },
            "required": ["name", "email", "password_hash"],
        })
    }
}

/// User as exposed to clients; never carries the password secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            name: u.name,
            email: u.email,
            avatar_url: u.avatar_url,
            is_active: u.is_active,
        }
    }
}

pub struct PostStatus;

impl PostStatus {
    pub const PUBLISHED: &'static str = "published";
    pub const DRAFT: &'static str = "draft";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogPost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    pub author_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// "draft" or "published" by convention; not enforced.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

impl Validate for BlogPost {
    fn validate(&self) -> Result<(), FieldError> {
        Ok(())
    }
}

impl Record for BlogPost {
    const COLLECTION: &'static str = "blogpost";
}

impl BlogPost {
    pub fn json_schema() -> Value {
        json!({
            "title": "BlogPost",
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Post title" },
                "slug": { "type": "string", "description": "URL-friendly slug" },
                "excerpt": optional_string("Short summary"),
                "content": { "type": "string", "description": "Markdown or HTML content" },
                "author_name": { "type": "string", "description": "Display author name" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "status": {
                    "type": "string",
                    "default": PostStatus::PUBLISHED,
                    "description": format!("{} | {}", PostStatus::DRAFT, PostStatus::PUBLISHED),
                },
                "published_at": {
                    "anyOf": [{ "type": "string", "format": "date-time" }, { "type": "null" }],
                    "default": null,
                },
            },
            "required": ["title", "slug", "content", "author_name"],
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Validate for ContactMessage {
    fn validate(&self) -> Result<(), FieldError> {
        check_email("email", &self.email)
    }
}

impl Record for ContactMessage {
    const COLLECTION: &'static str = "contactmessage";
}

impl ContactMessage {
    pub fn json_schema() -> Value {
        json!({
            "title": "ContactMessage",
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "email": { "type": "string", "format": "email" },
                "subject": { "type": "string" },
                "message": { "type": "string" },
            },
            "required": ["name", "email", "subject", "message"],
        })
    }
}
