//! Durable storage for uploaded audio and artwork.

pub mod sftp;

use async_trait::async_trait;

use crate::utils::file_utils::StagedFile;

pub use sftp::{SftpConfig, SftpMediaStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

impl MediaKind {
    /// Remote folder the asset is stored under.
    pub fn folder(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Image => "images",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media storage is not configured")]
    NotConfigured,
    #[error("media transfer failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("media session failed: {0}")]
    Ssh(#[from] ssh2::Error),
    #[error("media upload task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores the staged file and returns its public URL.
    async fn upload(&self, kind: MediaKind, file: &StagedFile) -> Result<String, MediaError>;
}

/// Used when no media backend is configured; every upload fails.
pub struct UnconfiguredMediaStorage;

#[async_trait]
impl MediaStorage for UnconfiguredMediaStorage {
    async fn upload(&self, kind: MediaKind, _file: &StagedFile) -> Result<String, MediaError> {
        tracing::warn!(folder = kind.folder(), "upload rejected, media storage not configured");
        Err(MediaError::NotConfigured)
    }
}
