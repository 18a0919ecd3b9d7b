use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::models::user_models::{
    display_name, AuthCallbackRequest, AuthCallbackResponse, NewUser, RoleSummary, User,
};
use crate::state::AppState;
use crate::utils::auth_utils::role_for_email;

/// Primary email of `clerk_id`, or `None` when the provider cannot tell.
async fn primary_email(state: &AppState, clerk_id: &str) -> Option<String> {
    match state.identity.get_user(clerk_id).await {
        Ok(profile) => profile.primary_email,
        Err(e) => {
            tracing::warn!(clerk_id, error = %e, "profile lookup failed during sign-up");
            None
        }
    }
}

/// Sign-up hook called by the frontend after the identity provider signs a user in.
pub async fn auth_callback(
    state: web::Data<AppState>,
    payload: web::Json<AuthCallbackRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();
    let clerk_id = payload
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("User ID is required"))?;
    let admin_email = state.settings.admin_email.as_deref();

    let user: User = match state.store.find_user_by_clerk_id(&clerk_id)? {
        Some(user) if user.role.is_some() => user,
        Some(user) => {
            let role = role_for_email(primary_email(&state, &clerk_id).await.as_deref(), admin_email);
            state.store.set_user_role(&user.id, role)?.unwrap_or(user)
        }
        None => {
            let role = role_for_email(primary_email(&state, &clerk_id).await.as_deref(), admin_email);
            let new_user = NewUser::new(
                &clerk_id,
                display_name(payload.first_name.as_deref(), payload.last_name.as_deref()),
                payload.image_url.unwrap_or_default(),
                role,
            );
            state.store.upsert_user(new_user)?
        }
    };

    Ok(HttpResponse::Ok().json(AuthCallbackResponse {
        success: true,
        user: RoleSummary {
            role: user.effective_role(),
        },
    }))
}
