//! SQLite-backed store.
//!
//! Layout expected by [`SqlStore`]:
//!
//! - `platform (name TEXT PRIMARY KEY)`
//! - one table per resource type (named by [`ResourceType::table`]) with
//!   `identifier INTEGER PRIMARY KEY`, `body TEXT` holding the JSON read
//!   representation, and a nullable `date_deleted` for soft deletion.
//!
//! Table names come from validated contracts (lowercase ASCII, digits,
//! underscores) and are quoted before being spliced into SQL.

use std::collections::BTreeSet;

use async_trait::async_trait;
use metacat_core::{Error, Registry, ResourceType, Result};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::ResourceStore;

/// Maximum pool connections.
const MAX_CONNECTIONS: u32 = 5;

/// Relational store over an SQLite database.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Connect to the database at `url` (e.g. `sqlite://catalogue.db`).
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await
            .map_err(|e| Error::upstream_with_source("failed to connect to database", e))?;
        log::info!("Connected to relational store at {url}");
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the platform table and one table per registered resource type,
    /// leaving existing tables untouched.
    pub async fn ensure_schema(&self, registry: &Registry) -> Result<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS platform (name TEXT PRIMARY KEY)")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::upstream_with_source("failed to create platform table", e))?;

        for rt in registry.iter() {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (\
                 identifier INTEGER PRIMARY KEY, \
                 body TEXT NOT NULL, \
                 date_deleted TEXT NULL)",
                rt.table()
            );
            sqlx::query(&ddl).execute(&self.pool).await.map_err(|e| {
                Error::upstream_with_source(format!("failed to create table '{}'", rt.table()), e)
            })?;
        }
        Ok(())
    }

    /// Register a platform (no-op if it already exists).
    pub async fn add_platform(&self, platform: &str) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO platform (name) VALUES (?)")
            .bind(platform)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::upstream_with_source("failed to insert platform", e))?;
        Ok(())
    }

    /// Insert or replace a record.
    pub async fn insert(
        &self,
        resource_type: &ResourceType,
        identifier: i64,
        record: &Value,
    ) -> Result<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO \"{}\" (identifier, body, date_deleted) VALUES (?, ?, NULL)",
            resource_type.table()
        );
        sqlx::query(&sql)
            .bind(identifier)
            .bind(serde_json::to_string(record)?)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::upstream_with_source("failed to insert record", e))?;
        Ok(())
    }

    /// Mark a record as deleted.
    pub async fn soft_delete(&self, resource_type: &ResourceType, identifier: i64) -> Result<()> {
        let sql = format!(
            "UPDATE \"{}\" SET date_deleted = datetime('now') WHERE identifier = ?",
            resource_type.table()
        );
        sqlx::query(&sql)
            .bind(identifier)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::upstream_with_source("failed to delete record", e))?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for SqlStore {
    async fn list_platforms(&self) -> Result<BTreeSet<String>> {
        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM platform")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::upstream_with_source("failed to list platforms", e))?;
        Ok(names.into_iter().collect())
    }

    async fn get_by_identifier(
        &self,
        resource_type: &ResourceType,
        identifier: i64,
    ) -> Result<Option<Value>> {
        let sql = format!(
            "SELECT body FROM \"{}\" WHERE identifier = ? AND date_deleted IS NULL",
            resource_type.table()
        );
        let body: Option<String> = sqlx::query_scalar(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                Error::upstream_with_source(
                    format!("failed to load {} {identifier}", resource_type.name()),
                    e,
                )
            })?;

        body.map(|b| serde_json::from_str(&b).map_err(Error::from))
            .transpose()
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
