use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::middleware::auth_gates::ArtistUser;
use crate::models::admin_models::ArtistUploads;
use crate::state::AppState;
use crate::utils::ingest_utils::{ingest_album, ingest_song, read_form, Uploader};

pub async fn upload_song(
    ArtistUser(user): ArtistUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(&state, payload).await?;
    let song = ingest_song(&state, form, Uploader::Artist { user_id: user.id }).await?;
    Ok(HttpResponse::Created().json(song))
}

pub async fn upload_album(
    ArtistUser(user): ArtistUser,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_form(&state, payload).await?;
    let album = ingest_album(&state, form, Uploader::Artist { user_id: user.id }).await?;
    Ok(HttpResponse::Created().json(album))
}

pub async fn my_uploads(ArtistUser(user): ArtistUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let songs = state.store.songs_uploaded_by(&user.id)?;
    let albums = state.store.albums_uploaded_by(&user.id)?;
    Ok(HttpResponse::Ok().json(ArtistUploads { songs, albums }))
}
