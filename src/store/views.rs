use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use parking_lot::RwLock;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

/// Per-URL view counters.
#[async_trait]
pub trait ViewCountStore: Send + Sync {
    /// Adds one view and returns the new count.
    async fn increment(&self, key: &str) -> Result<u64, sqlx::Error>;

    async fn get(&self, key: &str) -> Result<u64, sqlx::Error>;

    /// The `limit` most viewed keys, highest count first.
    async fn top(&self, limit: usize) -> Result<Vec<(String, u64)>, sqlx::Error>;
}

#[derive(Default, Debug)]
pub struct MemoryViewCounts {
    counts: RwLock<HashMap<String, u64>>,
}

impl MemoryViewCounts {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ranked(mut counts: Vec<(String, u64)>, limit: usize) -> Vec<(String, u64)> {
    counts.sort_by(|(a_key, a), (b_key, b)| b.cmp(a).then_with(|| a_key.cmp(b_key)));
    counts.truncate(limit);
    counts
}

#[async_trait]
impl ViewCountStore for MemoryViewCounts {
    async fn increment(&self, key: &str) -> Result<u64, sqlx::Error> {
        let mut counts = self.counts.write();
        let count = counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn get(&self, key: &str) -> Result<u64, sqlx::Error> {
        Ok(self.counts.read().get(key).copied().unwrap_or(0))
    }

    async fn top(&self, limit: usize) -> Result<Vec<(String, u64)>, sqlx::Error> {
        let counts = self
            .counts
            .read()
            .iter()
            .map(|(key, count)| (key.clone(), *count))
            .collect();
        Ok(ranked(counts, limit))
    }
}

/// View counters persisted in SQLite.
#[derive(Clone, Debug)]
pub struct SqliteViewCounts {
    pool: SqlitePool,
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

impl SqliteViewCounts {
    /// Opens (creating if needed) the database file and applies the schema.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let url = format!("sqlite://{}", path.display());
        let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database, used by tests.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let schema = include_str!("../../schema.sql");
        sqlx::query(schema).execute(&pool).await?;
        Ok(SqliteViewCounts { pool })
    }
}

#[async_trait]
impl ViewCountStore for SqliteViewCounts {
    async fn increment(&self, key: &str) -> Result<u64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "insert into view_counts (url, views) values (?, 1) \
             on conflict(url) do update set views = views + 1 \
             returning views",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await?;
        Ok(to_count(count))
    }

    async fn get(&self, key: &str) -> Result<u64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar("select views from view_counts where url = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count.map_or(0, to_count))
    }

    async fn top(&self, limit: usize) -> Result<Vec<(String, u64)>, sqlx::Error> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = sqlx::query("select url, views from view_counts order by views desc, url asc limit ?")
            .bind(limit)
            .fetch(&self.pool);

        let mut top = Vec::new();
        while let Some(row) = rows.try_next().await? {
            let url: String = row.try_get("url")?;
            let count: i64 = row.try_get("views")?;
            top.push((url, to_count(count)));
        }
        Ok(top)
    }
}
