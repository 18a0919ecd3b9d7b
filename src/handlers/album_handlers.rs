use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::auth_gates::Viewer;
use crate::models::album_models::AlbumWithSongs;
use crate::state::AppState;
use crate::utils::approval_utils::{is_visible, Visibility};

pub async fn list_albums(state: web::Data<AppState>, viewer: Viewer) -> AppResult<HttpResponse> {
    let albums = state.store.list_albums(Visibility::for_role(viewer.role()))?;
    Ok(HttpResponse::Ok().json(albums))
}

/// Hidden albums answer 404, same as missing ones.
pub async fn get_album(
    state: web::Data<AppState>,
    viewer: Viewer,
    album_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let album = state
        .store
        .find_album(&album_id)?
        .filter(|album| is_visible(album.is_approved, viewer.role()))
        .ok_or_else(|| AppError::not_found("Album not found"))?;

    let songs = state
        .store
        .album_songs(&album.id, Visibility::for_role(viewer.role()))?;

    Ok(HttpResponse::Ok().json(AlbumWithSongs { album, songs }))
}
