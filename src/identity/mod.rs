//! Session and user directory of the external identity provider.

pub mod clerk;

use async_trait::async_trait;

use crate::models::session_models::{SessionRecord, UserProfile};

pub use clerk::ClerkClient;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider answered with status {0}")]
    Status(u16),
    #[error("identity provider has no record for `{0}`")]
    NotFound(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Looks up a session by id. The caller decides whether its status is acceptable.
    async fn get_session(&self, session_id: &str) -> Result<SessionRecord, IdentityError>;

    /// Fetches the profile of an external user id.
    async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError>;
}
