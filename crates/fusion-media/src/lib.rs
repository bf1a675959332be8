//! Fusion Media Library
//!
//! Client for the hosted media-processing service. Uploads go through the
//! [`MediaHost`] trait so the API can be exercised against a fake in tests.
//!
//! # Upload presets
//!
//! - images: resource type `image`, folder `image-uploads`, stored as sent
//! - videos: resource type `video`, folder `video-uploads`, transcoded on ingest with `q_auto,f_mp4`

pub mod cloudinary;
pub mod signing;
pub mod traits;

// Re-export commonly used types
pub use cloudinary::CloudinaryHost;
pub use traits::{MediaHost, MediaHostError, MediaHostResult, UploadOptions, UploadedAsset};
