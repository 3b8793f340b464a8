use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::CreatePostRequest, services};
use crate::{
    auth::extractors::CurrentUser, error::ApiError, models::BlogPost, state::AppState,
    validation::ValidatedJson,
};

pub fn blog_routes() -> Router<AppState> {
    Router::new().route("/blog", get(list_posts).post(create_post))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let posts = services::list_published(state.store()?).await?;
    Ok(Json(posts))
}

#[instrument(skip_all)]
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = services::create_post(state.store()?, payload, &user.email).await?;
    Ok(Json(post))
}
