use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::ApiError,
    models::ContactMessage,
    state::AppState,
    store,
    validation::ValidatedJson,
};

#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit_contact))
}

/// Write-only intake; there is no read path.
#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(msg): ValidatedJson<ContactMessage>,
) -> Result<Json<Ack>, ApiError> {
    store::insert(state.store()?, &msg).await?;
    info!(subject = %msg.subject, "contact message received");
    Ok(Json(Ack { ok: true }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    fn post_contact(body: Value) -> Request<Body> {
        Request::post("/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn stores_message_and_acks() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let res = app
            .oneshot(post_contact(json!({
                "name": "A", "email": "a@x.com", "subject": "Hi", "message": "Hello"
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"ok": true}));

        let docs = state
            .store()
            .unwrap()
            .query("contactmessage", json!({"email": "a@x.com"}), 10)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["subject"], "Hi");
    }

    #[tokio::test]
    async fn rejects_invalid_email() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_contact(json!({
                "name": "A", "email": "nope", "subject": "Hi", "message": "Hello"
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
