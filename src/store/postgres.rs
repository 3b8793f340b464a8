use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use super::{unique_field_for, DocumentStore, StoreError};

/// Documents kept as JSONB rows in a single `documents` table.
#[derive(Clone)]
pub struct PostgresStore {
    db: PgPool,
}

impl PostgresStore {
    pub fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect_lazy(url)
            .context("parse database url")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4();
        let res = sqlx::query(
            r#"
            INSERT INTO documents (id, collection, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(collection)
        .bind(Json(&doc))
        .execute(&self.db)
        .await;

        match res {
            Ok(_) => Ok(id.to_string()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Duplicate {
                collection: collection.to_string(),
                field: unique_field_for(collection).unwrap_or("id").to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn query(
        &self,
        collection: &str,
        filter: Value,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        if !filter.is_object() {
            return Err(StoreError::BadFilter);
        }
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND body @> $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(collection)
        .bind(Json(&filter))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|Json(v)| v).collect())
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT collection FROM documents ORDER BY collection"#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(names)
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
