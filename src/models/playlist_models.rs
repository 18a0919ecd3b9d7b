use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::song_models::Song;

// --------------------- Playlist Models ---------------------
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::playlists)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    /// External identity id of the owner.
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::playlists)]
pub struct NewPlaylist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewPlaylist {
    pub fn new(user_id: &str, name: String, description: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            user_id: user_id.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_playlist(self) -> Playlist {
        Playlist {
            id: self.id,
            name: self.name,
            description: self.description,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::playlists)]
pub struct PlaylistChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl PlaylistChanges {
    pub fn apply_to(&self, playlist: &mut Playlist) {
        if let Some(name) = &self.name {
            playlist.name = name.clone();
        }
        if let Some(description) = &self.description {
            playlist.description = description.clone();
        }
        playlist.updated_at = self.updated_at;
    }
}

#[derive(Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

// --------------------- Playlist Songs Models ---------------------
#[derive(Queryable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::playlist_songs)]
pub struct PlaylistSong {
    pub playlist_id: String,
    pub song_id: String,
    pub position: i32,
    pub added_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::playlist_songs)]
pub struct NewPlaylistSong {
    pub playlist_id: String,
    pub song_id: String,
    pub position: i32,
    pub added_at: NaiveDateTime,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    pub song_id: Option<String>,
}

// --------------------- Response Models ---------------------
#[derive(Serialize)]
pub struct PlaylistResponse {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub songs: Vec<Song>,
}
