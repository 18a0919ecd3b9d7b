use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::auth_gates::Authenticated;
use crate::models::message_models::{NewMessage, SendMessageRequest};
use crate::state::AppState;

pub async fn current_user(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = state
        .store
        .find_user_by_clerk_id(&caller.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Everyone except the caller.
pub async fn list_users(caller: Authenticated, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users: Vec<_> = state
        .store
        .list_users()?
        .into_iter()
        .filter(|user| user.clerk_id != caller.user_id)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_messages(
    caller: Authenticated,
    state: web::Data<AppState>,
    other_user_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let messages = state.store.conversation(&caller.user_id, &other_user_id)?;
    Ok(HttpResponse::Ok().json(messages))
}

pub async fn send_message(
    caller: Authenticated,
    state: web::Data<AppState>,
    receiver_id: web::Path<String>,
    payload: web::Json<SendMessageRequest>,
) -> AppResult<HttpResponse> {
    let content = payload
        .into_inner()
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AppError::validation("Message content is required"))?;

    let message = state
        .store
        .insert_message(NewMessage::new(&caller.user_id, &receiver_id, content))?;
    tracing::debug!(message_id = %message.id, "message stored");
    Ok(HttpResponse::Created().json(message))
}
