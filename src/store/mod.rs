//! Generic document store: named collections of JSON documents with
//! `create` and equality-filtered `query`.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::validation::{FieldError, Validate};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// `(collection, top-level field)` pairs whose values must be unique.
pub const UNIQUE_FIELDS: &[(&str, &str)] = &[("user", "email")];

pub(crate) fn unique_field_for(collection: &str) -> Option<&'static str> {
    UNIQUE_FIELDS
        .iter()
        .find(|(c, _)| *c == collection)
        .map(|(_, f)| *f)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate {field} in {collection}")]
    Duplicate { collection: String, field: String },

    #[error("invalid record: {0}")]
    Invalid(FieldError),

    #[error("document filter must be a JSON object")]
    BadFilter,

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document and return its generated id.
    async fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError>;

    /// Documents of `collection` whose top-level fields equal every field of
    /// `filter`, newest first, at most `limit`.
    async fn query(
        &self,
        collection: &str,
        filter: Value,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError>;

    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;

    async fn close(&self) {}
}

/// A typed record stored in its own collection.
pub trait Record: Serialize + DeserializeOwned + Validate + Send + Sync {
    const COLLECTION: &'static str;
}

/// Validate and persist a typed record.
pub async fn insert<R: Record>(store: &dyn DocumentStore, record: &R) -> Result<String, StoreError> {
    record.validate().map_err(StoreError::Invalid)?;
    let doc = serde_json::to_value(record)?;
    let id = store.create(R::COLLECTION, doc).await?;
    debug!(collection = R::COLLECTION, %id, "document created");
    Ok(id)
}

/// Query a collection and decode each document into `R`.
pub async fn find<R: Record>(
    store: &dyn DocumentStore,
    filter: Value,
    limit: i64,
) -> Result<Vec<R>, StoreError> {
    store
        .query(R::COLLECTION, filter, limit)
        .await?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
        .collect()
}

pub async fn find_one<R: Record>(
    store: &dyn DocumentStore,
    filter: Value,
) -> Result<Option<R>, StoreError> {
    Ok(find::<R>(store, filter, 1).await?.into_iter().next())
}
