//! Append-only SQLite store for saved resume results

use crate::error::{Result, ResumeParserError};
use crate::storage::record::{join_list, split_list, NewRecord, SavedRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;

const SELECT_COLUMNS: &str = "SELECT id, owner, name, email, phone, skills, roles, \
     matched_keywords, unmatched_keywords, score, created_at FROM resumes";

/// Handle to the resumes table.
///
/// Each operation checks a connection out of the pool for its own duration
/// only; it goes back to the pool on every exit path when the guard drops.
#[derive(Clone)]
pub struct ResumeStore {
    pool: SqlitePool,
}

impl ResumeStore {
    /// Open (creating if needed) the database file and make sure the table exists
    pub async fn open(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        info!("Resume store opened: {}", database_path.display());

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resumes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner TEXT NOT NULL,
                name TEXT,
                email TEXT,
                phone TEXT,
                skills TEXT NOT NULL,
                roles TEXT,
                matched_keywords TEXT NOT NULL,
                unmatched_keywords TEXT NOT NULL,
                score INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_resumes_owner ON resumes(owner);")
            .execute(&mut *conn)
            .await?;

        debug!("Resume store schema ready");
        Ok(())
    }

    /// Insert one record and return it as stored
    pub async fn save(&self, record: NewRecord) -> Result<SavedRecord> {
        let created_at = Utc::now();
        let mut conn = self.pool.acquire().await?;

        let result = sqlx::query(
            "INSERT INTO resumes \
             (owner, name, email, phone, skills, roles, matched_keywords, unmatched_keywords, score, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.owner.as_str())
        .bind(record.name.as_deref())
        .bind(record.email.as_deref())
        .bind(record.phone.as_deref())
        .bind(join_list(&record.skills))
        .bind(record.roles.as_deref())
        .bind(join_list(&record.matched_keywords))
        .bind(join_list(&record.unmatched_keywords))
        .bind(i64::from(record.score))
        .bind(created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        info!("Saved resume record {} for owner '{}'", id, record.owner);

        Ok(SavedRecord::from_new(id, record, created_at))
    }

    pub async fn get(&self, id: i64) -> Result<Option<SavedRecord>> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    /// Most recent records first, optionally restricted to one owner
    pub async fn list(&self, owner: Option<&str>, limit: usize) -> Result<Vec<SavedRecord>> {
        let mut conn = self.pool.acquire().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = match owner {
            Some(owner) => {
                sqlx::query(&format!("{} WHERE owner = ? ORDER BY id DESC LIMIT ?", SELECT_COLUMNS))
                    .bind(owner)
                    .bind(limit)
                    .fetch_all(&mut *conn)
                    .await?
            }
            None => {
                sqlx::query(&format!("{} ORDER BY id DESC LIMIT ?", SELECT_COLUMNS))
                    .bind(limit)
                    .fetch_all(&mut *conn)
                    .await?
            }
        };

        rows.iter().map(row_to_record).collect()
    }

    pub async fn count(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query("SELECT COUNT(*) AS total FROM resumes")
            .fetch_one(&mut *conn)
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn decode_error(message: String) -> ResumeParserError {
    ResumeParserError::Storage(sqlx::Error::Decode(message.into()))
}

fn row_to_record(row: &SqliteRow) -> Result<SavedRecord> {
    let score: i64 = row.try_get("score")?;
    let score = u8::try_from(score)
        .map_err(|_| decode_error(format!("score out of range: {}", score)))?;

    let created_at: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| decode_error(format!("invalid created_at '{}': {}", created_at, e)))?
        .with_timezone(&Utc);

    Ok(SavedRecord {
        id: row.try_get("id")?,
        owner: row.try_get("owner")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        skills: split_list(row.try_get("skills")?),
        roles: row.try_get("roles")?,
        matched_keywords: split_list(row.try_get("matched_keywords")?),
        unmatched_keywords: split_list(row.try_get("unmatched_keywords")?),
        score,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record(owner: &str) -> NewRecord {
        NewRecord {
            owner: owner.to_string(),
            name: Some("John A Smith".to_string()),
            email: Some("john@example.com".to_string()),
            phone: None,
            skills: vec!["c++".to_string(), "python".to_string(), "Rust, stable".to_string()],
            roles: Some("Led a team of four.\nShipped billing v2.".to_string()),
            matched_keywords: vec!["python".to_string(), "sql".to_string()],
            unmatched_keywords: vec!["java".to_string()],
            score: 66,
        }
    }

    #[tokio::test]
    async fn test_saved_record_round_trips() {
        let dir = tempdir().unwrap();
        let store = ResumeStore::open(&dir.path().join("resumes.db")).await.unwrap();

        let saved = store.save(sample_record("alice")).await.unwrap();
        let loaded = store.get(saved.id).await.unwrap().unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.skills, vec!["c++", "python", "Rust, stable"]);
        assert_eq!(loaded.phone, None);
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let dir = tempdir().unwrap();
        let store = ResumeStore::open(&dir.path().join("resumes.db")).await.unwrap();
        assert!(store.get(42).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_filters_by_owner() {
        let dir = tempdir().unwrap();
        let store = ResumeStore::open(&dir.path().join("nested").join("resumes.db")).await.unwrap();

        let first = store.save(sample_record("alice")).await.unwrap();
        let second = store.save(sample_record("bob")).await.unwrap();
        let third = store.save(sample_record("alice")).await.unwrap();

        let all = store.list(None, 10).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let alice = store.list(Some("alice"), 10).await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.owner == "alice"));

        let limited = store.list(None, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, third.id);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resumes.db");

        let store = ResumeStore::open(&path).await.unwrap();
        let saved = store.save(sample_record("alice")).await.unwrap();
        store.close().await;

        let reopened = ResumeStore::open(&path).await.unwrap();
        assert_eq!(reopened.get(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_all_kept() {
        let dir = tempdir().unwrap();
        let store = ResumeStore::open(&dir.path().join("resumes.db")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.save(sample_record(&format!("user{}", i))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 8);
    }
}
