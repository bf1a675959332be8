//! Application state and sub-states.
//!
//! Everything here is immutable after start-up; each collaborator sits behind a trait
//! object so tests can swap in fakes.

use crate::auth::IdentityProvider;
use fusion_core::{Config, MediaKind, UploadValidator};
use fusion_db::VideoStore;
use fusion_media::MediaHost;
use std::sync::Arc;

/// Hosted media backend and the size limits applied before anything is sent to it.
#[derive(Clone)]
pub struct MediaState {
    pub host: Arc<dyn MediaHost>,
    pub image_validator: UploadValidator,
    pub video_validator: UploadValidator,
}

#[derive(Clone)]
pub struct DbState {
    pub videos: Arc<dyn VideoStore>,
}

/// Identity provider used by the access gate.
#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<dyn IdentityProvider>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub media: MediaState,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        host: Arc<dyn MediaHost>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let media = MediaState {
            host,
            image_validator: config.upload_validator(MediaKind::Image),
            video_validator: config.upload_validator(MediaKind::Video),
        };
        Self {
            config,
            db: DbState { videos },
            media,
            auth: AuthState { identity },
        }
    }
}
