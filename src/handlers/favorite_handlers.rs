use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::auth_gates::Authenticated;
use crate::models::favorite_models::{AddFavoriteRequest, FavoriteCheck, FavoriteResponse, NewFavorite};
use crate::models::session_models::Principal;
use crate::models::MessageResponse;
use crate::state::AppState;
use crate::store::StoreError;
use crate::utils::approval_utils::is_visible;

pub async fn add_favorite(
    caller: Authenticated,
    state: web::Data<AppState>,
    payload: web::Json<AddFavoriteRequest>,
) -> AppResult<HttpResponse> {
    let song_id = payload
        .into_inner()
        .song_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("Song ID is required"))?;

    let song = state
        .store
        .find_song(&song_id)?
        .ok_or_else(|| AppError::not_found("Song not found"))?;

    let viewer_role = state
        .store
        .find_user_by_clerk_id(&caller.user_id)?
        .map(|user| user.effective_role());
    if !is_visible(song.is_approved, viewer_role) {
        return Err(AppError::forbidden("Cannot favorite unapproved song"));
    }

    let favorite = state
        .store
        .insert_favorite(NewFavorite::new(&caller.user_id, &song.id))
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::Conflict("Song already in favorites".into()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Created().json(FavoriteResponse {
        id: favorite.id,
        user_id: favorite.user_id,
        song,
        created_at: favorite.created_at,
    }))
}

pub async fn remove_favorite(
    caller: Authenticated,
    state: web::Data<AppState>,
    song_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !state.store.delete_favorite(&caller.user_id, &song_id)? {
        return Err(AppError::not_found("Favorite not found"));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Removed from favorites")))
}

pub async fn list_favorites(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.favorite_songs(&caller.user_id)?))
}

/// Anonymous callers simply have no favorites.
pub async fn check_favorite(
    principal: Principal,
    state: web::Data<AppState>,
    song_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let is_favorite = match principal.user_id() {
        Some(user_id) => state.store.is_favorite(user_id, &song_id)?,
        None => false,
    };
    Ok(HttpResponse::Ok().json(FavoriteCheck { is_favorite }))
}
