use super::{ensure_unique_filenames, VideoRegistry};
use crate::intake::VideoFilter;
use crate::models::{Tag, VideoRecord};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;

/// Embedded registry keyed by filename. Each mutation runs in its own
/// transaction, so concurrent appends cannot lose each other's writes.
#[derive(Debug, Clone)]
pub struct SqliteRegistry {
    pool: SqlitePool,
    filter: VideoFilter,
}

impl SqliteRegistry {
    pub fn new(pool: SqlitePool, filter: VideoFilter) -> Self {
        Self { pool, filter }
    }

    pub async fn open(database_url: &str, filter: VideoFilter) -> anyhow::Result<Self> {
        let pool = storage::connect(database_url).await?;
        storage::migrate(&pool).await?;
        Ok(Self::new(pool, filter))
    }
}

type RecordRow = (String, String, String, String);

fn record_from_row((id, filename, prediction, tag): RecordRow) -> VideoRecord {
    VideoRecord {
        id,
        filename,
        prediction,
        tag: Tag::from(tag),
    }
}

async fn insert_record(
    tx: &mut Transaction<'_, Sqlite>,
    record: &VideoRecord,
) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO videos (id, filename, prediction, tag) VALUES (?1, ?2, ?3, ?4)")
        .bind(&record.id)
        .bind(&record.filename)
        .bind(&record.prediction)
        .bind(record.tag.as_str())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait::async_trait]
impl VideoRegistry for SqliteRegistry {
    async fn list_pending(&self) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>("SELECT path FROM pending_paths ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn append_pending(&self, paths: &[String]) -> anyhow::Result<usize> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0usize;
        for path in paths.iter().filter(|p| self.filter.is_video(p)) {
            let res = sqlx::query("INSERT OR IGNORE INTO pending_paths (path) VALUES (?1)")
                .bind(path)
                .execute(&mut *tx)
                .await?;
            added += res.rows_affected() as usize;
        }
        tx.commit().await?;
        Ok(added)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<VideoRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT id, filename, prediction, tag FROM videos ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(record_from_row).collect())
    }

    async fn append_record(&self, record: &VideoRecord) -> anyhow::Result<()> {
        // Re-appending a filename moves it to the end, like an appended JSON entry.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM videos WHERE filename = ?1")
            .bind(&record.filename)
            .execute(&mut *tx)
            .await?;
        insert_record(&mut tx, record).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_all(&self, records: &[VideoRecord]) -> anyhow::Result<()> {
        ensure_unique_filenames(records)?;
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM videos").execute(&mut *tx).await?;
        for record in records {
            insert_record(&mut tx, record).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove_by_filename(&self, filename: &str) -> anyhow::Result<bool> {
        let existed = Path::new(filename).exists();
        sqlx::query("DELETE FROM videos WHERE filename = ?1")
            .bind(filename)
            .execute(&self.pool)
            .await?;
        Ok(existed)
    }
}
