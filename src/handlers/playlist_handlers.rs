use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::auth_gates::Authenticated;
use crate::models::playlist_models::{
    AddSongRequest, CreatePlaylistRequest, NewPlaylist, Playlist, PlaylistChanges, PlaylistResponse,
    UpdatePlaylistRequest,
};
use crate::models::MessageResponse;
use crate::state::AppState;
use crate::store::StoreError;
use crate::utils::approval_utils::is_visible;

fn with_songs(state: &AppState, playlist: Playlist) -> AppResult<PlaylistResponse> {
    let songs = state.store.playlist_songs(&playlist.id)?;
    Ok(PlaylistResponse { playlist, songs })
}

fn owned_playlist(state: &AppState, playlist_id: &str, owner_id: &str) -> AppResult<Playlist> {
    state
        .store
        .find_playlist(playlist_id, owner_id)?
        .ok_or_else(|| AppError::not_found("Playlist not found"))
}

// --------------------- Playlists ---------------------
pub async fn create_playlist(
    caller: Authenticated,
    state: web::Data<AppState>,
    payload: web::Json<CreatePlaylistRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| AppError::validation("Playlist name is required"))?;

    let playlist = state.store.insert_playlist(NewPlaylist::new(
        &caller.user_id,
        name,
        payload.description.unwrap_or_default(),
    ))?;

    Ok(HttpResponse::Created().json(PlaylistResponse { playlist, songs: Vec::new() }))
}

pub async fn list_playlists(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let playlists = state
        .store
        .playlists_owned_by(&caller.user_id)?
        .into_iter()
        .map(|playlist| with_songs(&state, playlist))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(playlists))
}

pub async fn get_playlist(
    caller: Authenticated,
    state: web::Data<AppState>,
    playlist_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let playlist = owned_playlist(&state, &playlist_id, &caller.user_id)?;
    Ok(HttpResponse::Ok().json(with_songs(&state, playlist)?))
}

pub async fn update_playlist(
    caller: Authenticated,
    state: web::Data<AppState>,
    playlist_id: web::Path<String>,
    payload: web::Json<UpdatePlaylistRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();
    let changes = PlaylistChanges {
        name: payload.name.filter(|name| !name.trim().is_empty()),
        description: payload.description,
        updated_at: chrono::Utc::now().naive_utc(),
    };

    let playlist = state
        .store
        .update_playlist(&playlist_id, &caller.user_id, changes)?
        .ok_or_else(|| AppError::not_found("Playlist not found"))?;
    Ok(HttpResponse::Ok().json(with_songs(&state, playlist)?))
}

pub async fn delete_playlist(
    caller: Authenticated,
    state: web::Data<AppState>,
    playlist_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !state.store.delete_playlist(&playlist_id, &caller.user_id)? {
        return Err(AppError::not_found("Playlist not found"));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Playlist deleted successfully")))
}

// --------------------- Playlist Songs ---------------------
pub async fn add_song_to_playlist(
    caller: Authenticated,
    state: web::Data<AppState>,
    playlist_id: web::Path<String>,
    payload: web::Json<AddSongRequest>,
) -> AppResult<HttpResponse> {
    let song_id = payload
        .into_inner()
        .song_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Song ID is required"))?;

    let playlist = owned_playlist(&state, &playlist_id, &caller.user_id)?;
    let song = state
        .store
        .find_song(&song_id)?
        .ok_or_else(|| AppError::not_found("Song not found"))?;

    let viewer_role = state
        .store
        .find_user_by_clerk_id(&caller.user_id)?
        .map(|user| user.effective_role());
    if !is_visible(song.is_approved, viewer_role) {
        return Err(AppError::forbidden("Cannot add unapproved song to playlist"));
    }

    state
        .store
        .add_playlist_song(&playlist.id, &song.id)
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::Conflict("Song already in playlist".into()),
            other => other.into(),
        })?;

    let playlist = owned_playlist(&state, &playlist.id, &caller.user_id)?;
    Ok(HttpResponse::Ok().json(with_songs(&state, playlist)?))
}

pub async fn remove_song_from_playlist(
    caller: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (playlist_id, song_id) = path.into_inner();
    let playlist = owned_playlist(&state, &playlist_id, &caller.user_id)?;

    state.store.remove_playlist_song(&playlist.id, &song_id)?;
    Ok(HttpResponse::Ok().json(with_songs(&state, playlist)?))
}
