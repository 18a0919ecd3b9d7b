use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable};
use serde::Serialize;
use uuid::Uuid;

use crate::models::song_models::Song;

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::albums)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
    pub uploaded_by: Option<String>,
    pub is_approved: Option<bool>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::albums)]
pub struct NewAlbum {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub release_year: i32,
    pub uploaded_by: Option<String>,
    pub is_approved: Option<bool>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewAlbum {
    pub fn new(title: String, artist: String, release_year: i32, image_url: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            artist,
            image_url,
            release_year,
            uploaded_by: None,
            is_approved: Some(false),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_album(self) -> Album {
        Album {
            id: self.id,
            title: self.title,
            artist: self.artist,
            image_url: self.image_url,
            release_year: self.release_year,
            uploaded_by: self.uploaded_by,
            is_approved: self.is_approved,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::albums)]
pub struct AlbumChanges {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub release_year: Option<i32>,
    pub image_url: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl Default for AlbumChanges {
    fn default() -> Self {
        Self {
            title: None,
            artist: None,
            release_year: None,
            image_url: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl AlbumChanges {
    pub fn apply_to(&self, album: &mut Album) {
        if let Some(title) = &self.title {
            album.title = title.clone();
        }
        if let Some(artist) = &self.artist {
            album.artist = artist.clone();
        }
        if let Some(release_year) = self.release_year {
            album.release_year = release_year;
        }
        if let Some(image_url) = &self.image_url {
            album.image_url = image_url.clone();
        }
        album.updated_at = self.updated_at;
    }
}

/// Album detail with its member songs, in insertion order.
#[derive(Serialize)]
pub struct AlbumWithSongs {
    #[serde(flatten)]
    pub album: Album,
    pub songs: Vec<Song>,
}
