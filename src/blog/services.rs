use serde_json::json;
use time::OffsetDateTime;
use tracing::info;

use super::dto::CreatePostRequest;
use crate::{
    error::ApiError,
    models::{BlogPost, PostStatus},
    store::{self, DocumentStore},
};

/// Hard cap on `GET /blog`.
pub const LIST_LIMIT: i64 = 20;

/// Lowercase, trim, spaces to hyphens. Not guaranteed unique.
pub fn slugify(title: &str) -> String {
    title.to_lowercase().trim().replace(' ', "-")
}

pub fn build_post(req: CreatePostRequest, now: OffsetDateTime) -> BlogPost {
    let published_at = (req.status == PostStatus::PUBLISHED).then_some(now);
    BlogPost {
        slug: slugify(&req.title),
        title: req.title,
        excerpt: req.excerpt,
        content: req.content,
        author_name: req.author_name,
        tags: req.tags,
        status: req.status,
        published_at,
    }
}

pub async fn create_post(
    db: &dyn DocumentStore,
    req: CreatePostRequest,
    author_email: &str,
) -> Result<BlogPost, ApiError> {
    let post = build_post(req, OffsetDateTime::now_utc());
    store::insert(db, &post).await?;
    info!(slug = %post.slug, status = %post.status, by = %author_email, "post created");
    Ok(post)
}

pub async fn list_published(db: &dyn DocumentStore) -> Result<Vec<BlogPost>, ApiError> {
    let posts = store::find::<BlogPost>(db, json!({ "status": PostStatus::PUBLISHED }), LIST_LIMIT)
        .await?;
    Ok(posts)
}
