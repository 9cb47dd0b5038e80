//! SQLite implementation of the DurableStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::CacheResult;
use crate::domain::models::CacheEntry;
use crate::domain::ports::DurableStore;

#[derive(Clone)]
pub struct SqliteDurableStore {
    pool: SqlitePool,
}

impl SqliteDurableStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DurableStore for SqliteDurableStore {
    async fn insert(&self, entry: &CacheEntry) -> CacheResult<String> {
        let id = if entry.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            entry.id.clone()
        };
        let metadata_json = serde_json::to_string(&entry.metadata)?;

        sqlx::query(
            r#"INSERT INTO cache_entries (id, prompt_fingerprint, payload, model_tag, created_at, metadata)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   prompt_fingerprint = excluded.prompt_fingerprint,
                   payload = excluded.payload,
                   model_tag = excluded.model_tag,
                   created_at = excluded.created_at,
                   metadata = excluded.metadata"#,
        )
        .bind(&id)
        .bind(&entry.prompt_fingerprint)
        .bind(&entry.payload)
        .bind(&entry.model_tag)
        .bind(entry.created_at.timestamp_millis())
        .bind(&metadata_json)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_by_id(&self, id: &str) -> CacheResult<Option<CacheEntry>> {
        let row: Option<EntryRow> = sqlx::query_as("SELECT * FROM cache_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_into()).transpose()
    }

    async fn query_by_fingerprint(
        &self,
        fingerprint: &str,
        limit: u32,
    ) -> CacheResult<Vec<CacheEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"SELECT * FROM cache_entries
               WHERE prompt_fingerprint = ?
               ORDER BY created_at DESC
               LIMIT ?"#,
        )
        .bind(fingerprint)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_by_id(&self, id: &str) -> CacheResult<()> {
        // Absent ids are a success: delete is idempotent.
        sqlx::query("DELETE FROM cache_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_older_than(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u32,
    ) -> CacheResult<u64> {
        let result = sqlx::query(
            r#"DELETE FROM cache_entries
               WHERE id IN (
                   SELECT id FROM cache_entries
                   WHERE created_at < ?
                   ORDER BY created_at ASC
                   LIMIT ?
               )"#,
        )
        .bind(cutoff.timestamp_millis())
        .bind(i64::from(batch_size))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> CacheResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cache_entries")
            .fetch_one(&self.pool)
            .await?;

        #[allow(clippy::cast_sign_loss)]
        Ok(count as u64)
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    id: String,
    prompt_fingerprint: String,
    payload: String,
    model_tag: String,
    created_at: i64,
    metadata: String,
}

impl TryFrom<EntryRow> for CacheEntry {
    type Error = crate::domain::errors::CacheError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        let created_at = super::parse_epoch_millis(row.created_at)?;
        let metadata = super::parse_json_or_default(Some(row.metadata))?;

        Ok(CacheEntry {
            id: row.id,
            prompt_fingerprint: row.prompt_fingerprint,
            payload: row.payload,
            model_tag: row.model_tag,
            created_at,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use chrono::Duration;

    async fn store() -> SqliteDurableStore {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteDurableStore::new(pool)
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let store = store().await;
        let entry = CacheEntry::new("fp-1", "{\"answer\":42}", "gpt-4:0.7:1000")
            .with_metadata_entry("source", serde_json::json!("test"));

        let id = store.insert(&entry).await.unwrap();
        assert_eq!(id, "fp-1");

        let found = store.get_by_id("fp-1").await.unwrap().unwrap();
        assert_eq!(found.payload, entry.payload);
        assert_eq!(found.model_tag, entry.model_tag);
        assert_eq!(
            found.created_at.timestamp_millis(),
            entry.created_at.timestamp_millis()
        );
        assert_eq!(found.metadata, entry.metadata);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = store().await;
        assert!(store.get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_empty_id_generates_one() {
        let store = store().await;
        let mut entry = CacheEntry::new("fp-2", "payload", "m");
        entry.id = String::new();

        let id = store.insert(&entry).await.unwrap();
        assert!(!id.is_empty());

        let found = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.prompt_fingerprint, "fp-2");
    }

    #[tokio::test]
    async fn test_reinsert_same_id_overwrites() {
        let store = store().await;
        let first = CacheEntry::new("fp-3", "old payload", "m");
        store.insert(&first).await.unwrap();

        let second = CacheEntry::new("fp-3", "new payload", "m");
        store.insert(&second).await.unwrap();

        let found = store.get_by_id("fp-3").await.unwrap().unwrap();
        assert_eq!(found.payload, "new payload");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_by_fingerprint_most_recent_first() {
        let store = store().await;
        let now = Utc::now();

        for (i, age_secs) in [300, 100, 200].iter().enumerate() {
            let mut entry = CacheEntry::new("shared-fp", format!("payload-{i}"), "m")
                .with_created_at(now - Duration::seconds(*age_secs));
            entry.id = format!("id-{i}");
            store.insert(&entry).await.unwrap();
        }

        let found = store.query_by_fingerprint("shared-fp", 10).await.unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].id, "id-1"); // youngest
        assert_eq!(found[1].id, "id-2");
        assert_eq!(found[2].id, "id-0"); // oldest

        let limited = store.query_by_fingerprint("shared-fp", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, "id-1");
    }

    #[tokio::test]
    async fn test_delete_by_id_idempotent() {
        let store = store().await;
        store.insert(&CacheEntry::new("fp-4", "p", "m")).await.unwrap();

        store.delete_by_id("fp-4").await.unwrap();
        assert!(store.get_by_id("fp-4").await.unwrap().is_none());

        // Second delete of the same id still succeeds.
        store.delete_by_id("fp-4").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_older_than_respects_batch_size() {
        let store = store().await;
        let now = Utc::now();

        for i in 0..5 {
            let mut entry = CacheEntry::new(format!("fp-{i}"), "p", "m")
                .with_created_at(now - Duration::days(10));
            entry.id = format!("old-{i}");
            entry.prompt_fingerprint = format!("fp-{i}");
            store.insert(&entry).await.unwrap();
        }
        let fresh = CacheEntry::new("fp-fresh", "p", "m");
        store.insert(&fresh).await.unwrap();

        let cutoff = now - Duration::days(7);
        assert_eq!(store.delete_older_than(cutoff, 2).await.unwrap(), 2);
        assert_eq!(store.delete_older_than(cutoff, 2).await.unwrap(), 2);
        assert_eq!(store.delete_older_than(cutoff, 2).await.unwrap(), 1);
        assert_eq!(store.delete_older_than(cutoff, 2).await.unwrap(), 0);

        // The fresh entry survives.
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.get_by_id("fp-fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_older_than_removes_oldest_first() {
        let store = store().await;
        let now = Utc::now();

        let mut oldest = CacheEntry::new("fp-a", "p", "m")
            .with_created_at(now - Duration::days(20));
        oldest.id = "oldest".into();
        store.insert(&oldest).await.unwrap();

        let mut newer = CacheEntry::new("fp-b", "p", "m")
            .with_created_at(now - Duration::days(10));
        newer.id = "newer".into();
        store.insert(&newer).await.unwrap();

        let cutoff = now - Duration::days(7);
        assert_eq!(store.delete_older_than(cutoff, 1).await.unwrap(), 1);
        assert!(store.get_by_id("oldest").await.unwrap().is_none());
        assert!(store.get_by_id("newer").await.unwrap().is_some());
    }
}
