use crate::constants::middleware_constants::MSG_USER_NOT_FOUND;
use crate::error::AppError;
use crate::models::user_models::{display_name, NewUser, Role, User};
use crate::state::AppState;

/// Role a brand-new (or role-less legacy) user starts with.
pub fn role_for_email(primary_email: Option<&str>, admin_email: Option<&str>) -> Role {
    match (primary_email, admin_email) {
        (Some(email), Some(admin)) if !admin.trim().is_empty() && email.trim().eq_ignore_ascii_case(admin.trim()) => {
            Role::Admin
        }
        _ => Role::User,
    }
}

/// Maps an external identity id to its local user, creating it on first sight.
///
/// The stored role is authoritative. The admin email is only consulted when the
/// record is created or when a legacy record has no role yet.
pub async fn resolve_user(state: &AppState, clerk_id: &str) -> Result<User, AppError> {
    let admin_email = state.settings.admin_email.as_deref();

    match state.store.find_user_by_clerk_id(clerk_id)? {
        Some(user) if user.role.is_some() => Ok(user),
        Some(user) => {
            let primary_email = match state.identity.get_user(clerk_id).await {
                Ok(profile) => profile.primary_email,
                Err(e) => {
                    tracing::warn!(clerk_id, error = %e, "profile lookup failed during role backfill");
                    None
                }
            };
            let role = role_for_email(primary_email.as_deref(), admin_email);
            tracing::info!(clerk_id, %role, "backfilled missing role");
            Ok(state.store.set_user_role(&user.id, role)?.unwrap_or(user))
        }
        None => {
            let profile = state.identity.get_user(clerk_id).await.map_err(|e| {
                tracing::warn!(clerk_id, error = %e, "profile lookup failed for unknown user");
                AppError::forbidden(MSG_USER_NOT_FOUND)
            })?;

            let role = role_for_email(profile.primary_email.as_deref(), admin_email);
            let new_user = NewUser::new(
                clerk_id,
                display_name(profile.first_name.as_deref(), profile.last_name.as_deref()),
                profile.image_url.unwrap_or_default(),
                role,
            );
            let user = state.store.upsert_user(new_user)?;
            tracing::info!(clerk_id, user_id = %user.id, role = %user.effective_role(), "created local user");
            Ok(user)
        }
    }
}
