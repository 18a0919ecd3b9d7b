use actix_web::{web, HttpResponse};

use crate::constants::catalog_constants::{FEATURED_SAMPLE_SIZE, MADE_FOR_YOU_SAMPLE_SIZE, TRENDING_LIMIT};
use crate::error::{AppError, AppResult};
use crate::middleware::auth_gates::Viewer;
use crate::models::song_models::{PlayCountResponse, SongSummary};
use crate::state::AppState;
use crate::utils::approval_utils::Visibility;

pub async fn list_songs(state: web::Data<AppState>, viewer: Viewer) -> AppResult<HttpResponse> {
    let songs = state.store.list_songs(Visibility::for_role(viewer.role()))?;
    Ok(HttpResponse::Ok().json(songs))
}

pub async fn featured_songs(state: web::Data<AppState>, viewer: Viewer) -> AppResult<HttpResponse> {
    let songs = state
        .store
        .sample_songs(Visibility::for_role(viewer.role()), FEATURED_SAMPLE_SIZE)?;
    let summaries: Vec<SongSummary> = songs.into_iter().map(SongSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn made_for_you_songs(state: web::Data<AppState>, viewer: Viewer) -> AppResult<HttpResponse> {
    let songs = state
        .store
        .sample_songs(Visibility::for_role(viewer.role()), MADE_FOR_YOU_SAMPLE_SIZE)?;
    let summaries: Vec<SongSummary> = songs.into_iter().map(SongSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn trending_songs(state: web::Data<AppState>, viewer: Viewer) -> AppResult<HttpResponse> {
    let songs = state
        .store
        .top_played_songs(Visibility::for_role(viewer.role()), TRENDING_LIMIT)?;
    let summaries: Vec<SongSummary> = songs.into_iter().map(SongSummary::with_play_count).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

pub async fn increment_play_count(
    state: web::Data<AppState>,
    song_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let song = state
        .store
        .increment_play_count(&song_id)?
        .ok_or_else(|| AppError::not_found("Song not found"))?;

    Ok(HttpResponse::Ok().json(PlayCountResponse {
        play_count: song.play_count,
    }))
}
