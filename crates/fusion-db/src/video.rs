use async_trait::async_trait;
use chrono::Utc;
use fusion_core::models::{MediaRecord, NewMediaRecord};
use fusion_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence for video records.
///
/// Only creation and a newest-first listing exist; records are never updated or deleted.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Insert a record, assigning its id and creation time.
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError>;

    /// All records ordered by `created_at` descending, newest first.
    async fn list_recent(&self) -> Result<Vec<MediaRecord>, AppError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoRepository {
    #[tracing::instrument(skip(self, record), fields(public_id = %record.external_id))]
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let row = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            INSERT INTO videos (
                id, title, description, public_id,
                original_size, compressed_size, duration, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, public_id,
                      original_size, compressed_size, duration, created_at
            "#,
        )
        .bind(id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.external_id)
        .bind(record.original_size_bytes)
        .bind(record.compressed_size_bytes)
        .bind(record.duration_seconds)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert video record");
            AppError::write("Failed to save video", e)
        })?;

        tracing::debug!(video_id = %row.id, "Video record created");
        Ok(row)
    }

    #[tracing::instrument(skip(self))]
    async fn list_recent(&self) -> Result<Vec<MediaRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            SELECT id, title, description, public_id,
                   original_size, compressed_size, duration, created_at
            FROM videos
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list video records");
            AppError::query("Failed to fetch videos", e)
        })?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::query("Database unavailable", e))
    }
}
