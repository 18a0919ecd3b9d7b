use actix_multipart::Multipart;

use crate::error::{AppError, AppResult};
use crate::media::MediaKind;
use crate::models::album_models::{Album, AlbumChanges, NewAlbum};
use crate::models::song_models::{NewSong, Song, SongChanges};
use crate::state::AppState;
use crate::utils::file_utils::{read_upload_form, UploadForm};

pub const AUDIO_FIELD: &str = "audioFile";
pub const IMAGE_FIELD: &str = "imageFile";

/// Who is creating a catalog entry. Admin uploads are published immediately,
/// artist uploads wait for moderation.
#[derive(Debug, Clone)]
pub enum Uploader {
    Admin,
    Artist { user_id: String },
}

impl Uploader {
    fn uploaded_by(&self) -> Option<String> {
        match self {
            Uploader::Admin => None,
            Uploader::Artist { user_id } => Some(user_id.clone()),
        }
    }

    fn approved(&self) -> bool {
        matches!(self, Uploader::Admin)
    }
}

pub async fn read_form(state: &AppState, payload: Multipart) -> AppResult<UploadForm> {
    let settings = &state.settings;
    Ok(read_upload_form(payload, &settings.upload_dir, settings.max_upload_bytes).await?)
}

fn required<'a>(form: &'a UploadForm, field: &str) -> AppResult<&'a str> {
    form.text(field)
        .ok_or_else(|| AppError::validation(format!("Field `{field}` is required")))
}

fn parse_number(raw: &str, field: &str) -> AppResult<i32> {
    raw.parse::<i32>()
        .ok()
        .filter(|n| *n >= 0)
        .ok_or_else(|| AppError::validation(format!("Field `{field}` must be a non-negative whole number")))
}

fn optional_number(form: &UploadForm, field: &str) -> AppResult<Option<i32>> {
    form.text(field).map(|raw| parse_number(raw, field)).transpose()
}

async fn upload_image(state: &AppState, form: &UploadForm) -> AppResult<Option<String>> {
    match form.file(IMAGE_FIELD) {
        Some(image) => Ok(Some(state.media.upload(MediaKind::Image, image).await?)),
        None => Ok(None),
    }
}

fn ensure_album_exists(state: &AppState, album_id: &str) -> AppResult<()> {
    match state.store.find_album(album_id)? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Album not found")),
    }
}

/// Creates a song from `audioFile`, `imageFile`, `title`, `artist`, `duration` and optional `albumId`.
pub async fn ingest_song(state: &AppState, form: UploadForm, uploader: Uploader) -> AppResult<Song> {
    let (Some(audio), Some(image)) = (form.file(AUDIO_FIELD), form.file(IMAGE_FIELD)) else {
        return Err(AppError::validation("Please upload all files"));
    };
    let title = required(&form, "title")?.to_string();
    let artist = required(&form, "artist")?.to_string();
    let duration = parse_number(required(&form, "duration")?, "duration")?;
    let album_id = form.text("albumId").map(str::to_owned);
    if let Some(album_id) = &album_id {
        ensure_album_exists(state, album_id)?;
    }

    let audio_url = state.media.upload(MediaKind::Audio, audio).await?;
    let image_url = state.media.upload(MediaKind::Image, image).await?;

    let mut song = NewSong::new(title, artist, duration, audio_url, image_url);
    song.album_id = album_id;
    song.uploaded_by = uploader.uploaded_by();
    song.is_approved = Some(uploader.approved());

    let song = state.store.insert_song(song)?;
    tracing::info!(song_id = %song.id, approved = ?song.is_approved, "song created");
    Ok(song)
}

/// Creates an album from `imageFile`, `title`, `artist` and `releaseYear`.
pub async fn ingest_album(state: &AppState, form: UploadForm, uploader: Uploader) -> AppResult<Album> {
    let Some(image) = form.file(IMAGE_FIELD) else {
        return Err(AppError::validation("Please upload album image"));
    };
    let title = required(&form, "title")?.to_string();
    let artist = required(&form, "artist")?.to_string();
    let release_year = parse_number(required(&form, "releaseYear")?, "releaseYear")?;

    let image_url = state.media.upload(MediaKind::Image, image).await?;

    let mut album = NewAlbum::new(title, artist, release_year, image_url);
    album.uploaded_by = uploader.uploaded_by();
    album.is_approved = Some(uploader.approved());

    let album = state.store.insert_album(album)?;
    tracing::info!(album_id = %album.id, approved = ?album.is_approved, "album created");
    Ok(album)
}

/// Builds a partial song update. An empty `albumId` detaches the song from its album.
pub async fn song_changes(state: &AppState, form: &UploadForm) -> AppResult<SongChanges> {
    let album_id = match form.text("albumId") {
        Some(album_id) => {
            ensure_album_exists(state, album_id)?;
            Some(Some(album_id.to_string()))
        }
        None if form_has_field(form, "albumId") => Some(None),
        None => None,
    };

    Ok(SongChanges {
        title: form.text("title").map(str::to_owned),
        artist: form.text("artist").map(str::to_owned),
        duration: optional_number(form, "duration")?,
        album_id,
        image_url: upload_image(state, form).await?,
        ..SongChanges::default()
    })
}

pub async fn album_changes(state: &AppState, form: &UploadForm) -> AppResult<AlbumChanges> {
    Ok(AlbumChanges {
        title: form.text("title").map(str::to_owned),
        artist: form.text("artist").map(str::to_owned),
        release_year: optional_number(form, "releaseYear")?,
        image_url: upload_image(state, form).await?,
        ..AlbumChanges::default()
    })
}

fn form_has_field(form: &UploadForm, name: &str) -> bool {
    form.raw_text(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_must_be_non_negative_integers() {
        assert_eq!(parse_number("215", "duration").unwrap(), 215);
        assert!(parse_number("-1", "duration").is_err());
        assert!(parse_number("3.5", "duration").is_err());
        assert!(parse_number("abc", "releaseYear").is_err());
    }

    #[test]
    fn artist_uploads_wait_for_moderation() {
        let artist = Uploader::Artist { user_id: "u1".into() };
        assert!(!artist.approved());
        assert_eq!(artist.uploaded_by().as_deref(), Some("u1"));

        assert!(Uploader::Admin.approved());
        assert_eq!(Uploader::Admin.uploaded_by(), None);
    }
}
