use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    models::{BlogPost, ContactMessage, User},
    state::AppState,
    store::Record,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Banner {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub collections: Vec<CollectionSchema>,
}

/// Store connectivity check. Always 200; degradation is reported in `database`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreCheck {
    pub backend: String,
    pub database: String,
    pub collections: Vec<String>,
}

pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/schema", get(schema))
        .route("/test", get(test_database))
}

pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "SaaS API running".into(),
    })
}

fn collection<R: Record>(schema: Value) -> CollectionSchema {
    CollectionSchema {
        name: R::COLLECTION.to_string(),
        schema,
    }
}

pub async fn schema() -> Json<SchemaResponse> {
    Json(SchemaResponse {
        collections: vec![
            collection::<User>(User::json_schema()),
            collection::<BlogPost>(BlogPost::json_schema()),
            collection::<ContactMessage>(ContactMessage::json_schema()),
        ],
    })
}

#[instrument(skip(state))]
pub async fn test_database(State(state): State<AppState>) -> Json<StoreCheck> {
    let mut res = StoreCheck {
        backend: "OK".into(),
        database: "Not Available".into(),
        collections: Vec::new(),
    };

    if let Some(store) = &state.store {
        match store.list_collections().await {
            Ok(names) => {
                res.database = "Connected".into();
                res.collections = names;
            }
            Err(e) => {
                warn!(error = %e, "store check failed");
                let msg: String = e.to_string().chars().take(80).collect();
                res.database = format!("Error: {msg}");
            }
        }
    }

    Json(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::{
        app::build_app,
        config::AppConfig,
        store::{DocumentStore, StoreError},
    };

    struct DownStore;

    #[async_trait]
    impl DocumentStore for DownStore {
        async fn create(&self, _c: &str, _d: Value) -> Result<String, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn query(&self, _c: &str, _f: Value, _l: i64) -> Result<Vec<Value>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(state: AppState, uri: &str) -> (StatusCode, T) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = build_app(state).oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn root_returns_banner() {
        let (status, body) = get_json::<Banner>(AppState::fake(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.message, "SaaS API running");
    }

    #[tokio::test]
    async fn schema_lists_three_collections() {
        let (status, body) = get_json::<SchemaResponse>(AppState::fake(), "/schema").await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["user", "blogpost", "contactmessage"]);
        assert_eq!(body.collections[0].schema["title"], "User");
    }

    #[tokio::test]
    async fn store_check_reports_connected() {
        let (status, body) = get_json::<StoreCheck>(AppState::fake(), "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.backend, "OK");
        assert_eq!(body.database, "Connected");
    }

    #[tokio::test]
    async fn store_check_reports_missing_store() {
        let state = AppState::from_parts(None, Arc::new(AppConfig::for_tests()));
        let (status, body) = get_json::<StoreCheck>(state, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.database, "Not Available");
        assert!(body.collections.is_empty());
    }

    #[tokio::test]
    async fn store_check_reports_store_errors() {
        let state = AppState::from_parts(Some(Arc::new(DownStore)), Arc::new(AppConfig::for_tests()));
        let (status, body) = get_json::<StoreCheck>(state, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.database.starts_with("Error: "));
        assert!(body.database.len() <= "Error: ".len() + 80);
    }
}
