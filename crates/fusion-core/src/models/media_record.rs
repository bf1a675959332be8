use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A video uploaded to the hosted media service and recorded locally.
///
/// Records are written once after a successful upload and never changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MediaRecord {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Identifier assigned by the hosted media service
    #[serde(rename = "publicId")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "public_id"))]
    pub external_id: String,
    #[serde(rename = "originalSize")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "original_size"))]
    pub original_size_bytes: i64,
    #[serde(rename = "compressedSize")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "compressed_size"))]
    pub compressed_size_bytes: i64,
    /// Zero when the hosted service did not report a duration
    #[serde(rename = "duration")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "duration"))]
    pub duration_seconds: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl MediaRecord {
    /// Size reduction achieved by the hosted service, in percent.
    pub fn compression_savings_percent(&self) -> Option<f64> {
        if self.original_size_bytes <= 0 {
            return None;
        }
        let ratio = self.compressed_size_bytes as f64 / self.original_size_bytes as f64;
        Some(((1.0 - ratio) * 100.0).clamp(0.0, 100.0))
    }

    /// Duration as `m:ss`.
    pub fn formatted_duration(&self) -> String {
        let total = self.duration_seconds.max(0.0).round() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// Fields needed to create a [`MediaRecord`]; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub external_id: String,
    pub original_size_bytes: i64,
    pub compressed_size_bytes: i64,
    pub duration_seconds: f64,
}

impl NewMediaRecord {
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> MediaRecord {
        MediaRecord {
            id,
            title: self.title,
            description: self.description,
            external_id: self.external_id,
            original_size_bytes: self.original_size_bytes,
            compressed_size_bytes: self.compressed_size_bytes,
            duration_seconds: self.duration_seconds,
            created_at,
        }
    }
}
