pub mod admin_models;
pub mod album_models;
pub mod favorite_models;
pub mod message_models;
pub mod playlist_models;
pub mod session_models;
pub mod song_models;
pub mod stat_models;
pub mod token_models;
pub mod user_models;

use serde::Serialize;

/// `{ "message": ... }` body shared by confirmations and errors.
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
