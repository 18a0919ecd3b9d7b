use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable};
use serde::Serialize;
use uuid::Uuid;

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::songs)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    pub duration: i32,
    pub album_id: Option<String>,
    pub uploaded_by: Option<String>,
    pub is_approved: Option<bool>,
    pub play_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::songs)]
pub struct NewSong {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    pub duration: i32,
    pub album_id: Option<String>,
    pub uploaded_by: Option<String>,
    pub is_approved: Option<bool>,
    pub play_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewSong {
    pub fn new(title: String, artist: String, duration: i32, audio_url: String, image_url: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            artist,
            image_url,
            audio_url,
            duration,
            album_id: None,
            uploaded_by: None,
            is_approved: Some(false),
            play_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_song(self) -> Song {
        Song {
            id: self.id,
            title: self.title,
            artist: self.artist,
            image_url: self.image_url,
            audio_url: self.audio_url,
            duration: self.duration,
            album_id: self.album_id,
            uploaded_by: self.uploaded_by,
            is_approved: self.is_approved,
            play_count: self.play_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial update; `None` leaves a column untouched, `album_id: Some(None)` detaches the song.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::songs)]
pub struct SongChanges {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<i32>,
    pub album_id: Option<Option<String>>,
    pub image_url: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl Default for SongChanges {
    fn default() -> Self {
        Self {
            title: None,
            artist: None,
            duration: None,
            album_id: None,
            image_url: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl SongChanges {
    pub fn apply_to(&self, song: &mut Song) {
        if let Some(title) = &self.title {
            song.title = title.clone();
        }
        if let Some(artist) = &self.artist {
            song.artist = artist.clone();
        }
        if let Some(duration) = self.duration {
            song.duration = duration;
        }
        if let Some(album_id) = &self.album_id {
            song.album_id = album_id.clone();
        }
        if let Some(image_url) = &self.image_url {
            song.image_url = image_url.clone();
        }
        song.updated_at = self.updated_at;
    }
}

/// Projection used by the home-page carousels.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_count: Option<i32>,
}

impl SongSummary {
    pub fn with_play_count(song: Song) -> Self {
        let play_count = Some(song.play_count);
        Self { play_count, ..Self::from(song) }
    }
}

impl From<Song> for SongSummary {
    fn from(s: Song) -> Self {
        SongSummary {
            id: s.id,
            title: s.title,
            artist: s.artist,
            image_url: s.image_url,
            audio_url: s.audio_url,
            play_count: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCountResponse {
    pub play_count: i32,
}
