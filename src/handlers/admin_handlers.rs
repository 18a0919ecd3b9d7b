use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::auth_gates::AdminUser;
use crate::models::admin_models::{AdminCheck, ApproveAllResponse};
use crate::models::session_models::Principal;
use crate::models::user_models::{Role, UpdateUserRole};
use crate::models::MessageResponse;
use crate::state::AppState;
use crate::utils::auth_utils::resolve_user;
use crate::utils::ingest_utils::{album_changes, ingest_album, ingest_song, read_form, song_changes, Uploader};

/// Answers `{admin}` for anyone; failures along the way count as "not admin".
pub async fn check_admin(state: web::Data<AppState>, principal: Principal) -> HttpResponse {
    let admin = match principal.user_id() {
        Some(clerk_id) => match resolve_user(&state, clerk_id).await {
            Ok(user) => user.effective_role() == Role::Admin,
            Err(e) => {
                tracing::debug!(clerk_id, error = %e, "admin check fell back to false");
                false
            }
        },
        None => false,
    };
    HttpResponse::Ok().json(AdminCheck { admin })
}

// --------------------- Songs ---------------------
pub async fn create_song(
    _admin: AdminUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(&state, payload).await?;
    let song = ingest_song(&state, form, Uploader::Admin).await?;
    Ok(HttpResponse::Created().json(song))
}

pub async fn update_song(
    _admin: AdminUser,
    state: web::Data<AppState>,
    song_id: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    if state.store.find_song(&song_id)?.is_none() {
        return Err(AppError::not_found("Song not found"));
    }
    let form = read_form(&state, payload).await?;
    let changes = song_changes(&state, &form).await?;

    let song = state
        .store
        .update_song(&song_id, changes)?
        .ok_or_else(|| AppError::not_found("Song not found"))?;
    Ok(HttpResponse::Ok().json(song))
}

pub async fn delete_song(
    _admin: AdminUser,
    state: web::Data<AppState>,
    song_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !state.store.delete_song(&song_id)? {
        return Err(AppError::not_found("Song not found"));
    }
    tracing::info!(song_id = %song_id, "song deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Song deleted successfully")))
}

async fn set_song_approval(state: &AppState, song_id: &str, approved: bool) -> AppResult<HttpResponse> {
    let song = state
        .store
        .set_song_approval(song_id, approved)?
        .ok_or_else(|| AppError::not_found("Song not found"))?;
    tracing::info!(song_id, approved, "song moderated");
    Ok(HttpResponse::Ok().json(song))
}

pub async fn approve_song(
    _admin: AdminUser,
    state: web::Data<AppState>,
    song_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    set_song_approval(&state, &song_id, true).await
}

pub async fn reject_song(
    _admin: AdminUser,
    state: web::Data<AppState>,
    song_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    set_song_approval(&state, &song_id, false).await
}

pub async fn pending_songs(_admin: AdminUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.pending_songs()?))
}

/// One-off migration: approve every song that is unmoderated or rejected.
pub async fn approve_all_existing_songs(
    _admin: AdminUser,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let modified_count = state.store.approve_unmoderated_songs()?;
    tracing::info!(modified_count, "approved existing songs");
    Ok(HttpResponse::Ok().json(ApproveAllResponse {
        message: format!("Approved {modified_count} existing songs"),
        modified_count,
    }))
}

// --------------------- Albums ---------------------
pub async fn create_album(
    _admin: AdminUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(&state, payload).await?;
    let album = ingest_album(&state, form, Uploader::Admin).await?;
    Ok(HttpResponse::Created().json(album))
}

pub async fn update_album(
    _admin: AdminUser,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    if state.store.find_album(&album_id)?.is_none() {
        return Err(AppError::not_found("Album not found"));
    }
    let form = read_form(&state, payload).await?;
    let changes = album_changes(&state, &form).await?;

    let album = state
        .store
        .update_album(&album_id, changes)?
        .ok_or_else(|| AppError::not_found("Album not found"))?;
    Ok(HttpResponse::Ok().json(album))
}

/// Removes the album together with its member songs.
pub async fn delete_album(
    _admin: AdminUser,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !state.store.delete_album_with_songs(&album_id)? {
        return Err(AppError::not_found("Album not found"));
    }
    tracing::info!(album_id = %album_id, "album deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Album deleted successfully")))
}

async fn set_album_approval(state: &AppState, album_id: &str, approved: bool) -> AppResult<HttpResponse> {
    let album = state
        .store
        .set_album_approval(album_id, approved)?
        .ok_or_else(|| AppError::not_found("Album not found"))?;
    tracing::info!(album_id, approved, "album moderated");
    Ok(HttpResponse::Ok().json(album))
}

pub async fn approve_album(
    _admin: AdminUser,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    set_album_approval(&state, &album_id, true).await
}

pub async fn reject_album(
    _admin: AdminUser,
    state: web::Data<AppState>,
    album_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    set_album_approval(&state, &album_id, false).await
}

pub async fn pending_albums(_admin: AdminUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.pending_albums()?))
}

// --------------------- Users ---------------------
pub async fn list_users(_admin: AdminUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.list_users()?))
}

pub async fn get_user(
    _admin: AdminUser,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user = state
        .store
        .find_user(&user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user(
    AdminUser(admin): AdminUser,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRole>,
) -> AppResult<HttpResponse> {
    let role = payload
        .role
        .as_deref()
        .filter(|role| !role.is_empty())
        .map(|role| role.parse::<Role>().map_err(|_| AppError::validation("Invalid role")))
        .transpose()?;

    let user = match role {
        Some(role) => {
            let updated = state.store.set_user_role(&user_id, role)?;
            if updated.is_some() {
                tracing::info!(user_id = %user_id, %role, by = %admin.id, "role changed");
            }
            updated
        }
        None => state.store.find_user(&user_id)?,
    }
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete_user(
    _admin: AdminUser,
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    if !state.store.delete_user(&user_id)? {
        return Err(AppError::not_found("User not found"));
    }
    tracing::info!(user_id = %user_id, "user deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}
