use serde::Serialize;

use crate::models::album_models::Album;
use crate::models::song_models::Song;

#[derive(Serialize)]
pub struct AdminCheck {
    pub admin: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAllResponse {
    pub message: String,
    pub modified_count: usize,
}

/// Everything an artist has submitted, newest first.
#[derive(Serialize)]
pub struct ArtistUploads {
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
}
