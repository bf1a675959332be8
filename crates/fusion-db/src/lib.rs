//! Database repositories
//!
//! The relational store only holds video records. Repositories take a pooled
//! `PgPool`; connections are acquired per query and returned to the pool.

pub mod video;

pub use video::{PgVideoRepository, VideoStore};
