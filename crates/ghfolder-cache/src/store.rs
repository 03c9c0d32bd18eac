//! SQLite implementation of IFingerprintStore
//!
//! ## Type Mapping
//!
//! | Domain Type   | SQL Type | Strategy                                      |
//! |---------------|----------|-----------------------------------------------|
//! | RelativePath  | TEXT     | `/`-joined key via `as_key()` / `parse()`     |
//! | Fingerprint   | TEXT     | String via `.as_str()` / `Fingerprint::new()` |
//! | DateTime<Utc> | TEXT     | RFC 3339 via `to_rfc3339()`                   |

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use ghfolder_core::domain::{Fingerprint, FingerprintRecord, RelativePath};
use ghfolder_core::ports::IFingerprintStore;

use crate::CacheError;

/// SQLite-based fingerprint store
///
/// Every write is a single `INSERT ... ON CONFLICT DO UPDATE` statement, so
/// two writers racing on one key are serialized by SQLite and the last
/// write wins without a read-modify-write window.
pub struct SqliteFingerprintStore {
    pool: SqlitePool,
}

impl SqliteFingerprintStore {
    /// Creates a new store on top of the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CacheError::CorruptRecord(format!("Failed to parse datetime '{}': {}", s, e)))
}

fn record_from_row(row: &SqliteRow) -> Result<FingerprintRecord, CacheError> {
    let key: String = row.try_get("relative_path")?;
    let fingerprint: String = row.try_get("fingerprint")?;
    let synced_at: String = row.try_get("last_synced_at")?;

    let relative_path = RelativePath::parse(&key)
        .map_err(|e| CacheError::CorruptRecord(format!("relative_path '{}': {}", key, e)))?;
    let fingerprint = Fingerprint::new(fingerprint)
        .map_err(|e| CacheError::CorruptRecord(format!("fingerprint for '{}': {}", key, e)))?;

    Ok(FingerprintRecord {
        relative_path,
        fingerprint,
        last_synced_at: parse_datetime(&synced_at)?,
    })
}

// ============================================================================
// IFingerprintStore implementation
// ============================================================================

#[async_trait::async_trait]
impl IFingerprintStore for SqliteFingerprintStore {
    async fn get(&self, path: &RelativePath) -> anyhow::Result<Option<FingerprintRecord>> {
        let row = sqlx::query(
            "SELECT relative_path, fingerprint, last_synced_at FROM fingerprints WHERE relative_path = ?",
        )
        .bind(path.as_key())
        .fetch_optional(&self.pool)
        .await
        .map_err(CacheError::from)?;

        match row {
            Some(ref r) => Ok(Some(record_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: &FingerprintRecord) -> anyhow::Result<()> {
        let key = record.relative_path.as_key();
        let file_name = record.relative_path.file_name().ok_or_else(|| {
            CacheError::QueryFailed("Cannot record a fingerprint for the sync root".to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO fingerprints (relative_path, file_name, fingerprint, last_synced_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(relative_path) DO UPDATE SET
                fingerprint = excluded.fingerprint,
                last_synced_at = excluded.last_synced_at
            "#,
        )
        .bind(&key)
        .bind(file_name)
        .bind(record.fingerprint.as_str())
        .bind(record.last_synced_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(CacheError::from)?;

        tracing::trace!(path = %key, fingerprint = %record.fingerprint, "Fingerprint recorded");
        Ok(())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<FingerprintRecord>> {
        let rows = sqlx::query(
            "SELECT relative_path, fingerprint, last_synced_at FROM fingerprints ORDER BY relative_path",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(CacheError::from)?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}
