//! Per-route authorization, expressed as extractors.
//!
//! A handler that takes [`Authenticated`], [`AdminUser`] or [`ArtistUser`] is
//! gated by it; [`Viewer`] never rejects and only tells the handler who is looking.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::constants::middleware_constants::{MSG_ADMIN_ONLY, MSG_ARTIST_ONLY, MSG_LOGIN_REQUIRED};
use crate::error::AppError;
use crate::models::session_models::Principal;
use crate::models::user_models::{Role, User};
use crate::state::AppState;
use crate::utils::auth_utils::resolve_user;

fn principal_of(req: &HttpRequest) -> Principal {
    req.extensions()
        .get::<Principal>()
        .cloned()
        .unwrap_or(Principal::Anonymous)
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("application state is not registered".into()))
}

/// External id of a signed-in caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user_id: String,
}

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match principal_of(req) {
            Principal::Authenticated { user_id, .. } => Ok(Authenticated { user_id }),
            Principal::Anonymous => Err(AppError::Unauthorized(MSG_LOGIN_REQUIRED.into())),
        };
        ready(result)
    }
}

/// Resolves the caller's local user and checks its role. 401 when anonymous, 403 when the role is not allowed.
async fn gate(req: HttpRequest, allowed: fn(Role) -> bool, denied: &'static str) -> Result<User, AppError> {
    let Principal::Authenticated { user_id, .. } = principal_of(&req) else {
        return Err(AppError::Unauthorized(MSG_LOGIN_REQUIRED.into()));
    };
    let state = app_state(&req)?;
    let user = resolve_user(&state, &user_id).await?;

    if allowed(user.effective_role()) {
        Ok(user)
    } else {
        tracing::debug!(clerk_id = %user_id, role = %user.effective_role(), "role gate denied");
        Err(AppError::forbidden(denied))
    }
}

/// A caller whose stored role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            gate(req, |role| role == Role::Admin, MSG_ADMIN_ONLY)
                .await
                .map(AdminUser)
        })
    }
}

/// A caller whose stored role is `artist` or `admin`.
#[derive(Debug, Clone)]
pub struct ArtistUser(pub User);

impl FromRequest for ArtistUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            gate(req, |role| role.is_artist_or_admin(), MSG_ARTIST_ONLY)
                .await
                .map(ArtistUser)
        })
    }
}

/// Whoever is looking, plus their local record when one already exists.
///
/// Never creates users and never rejects.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub principal: Principal,
    pub user: Option<User>,
}

impl Viewer {
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(User::effective_role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

impl FromRequest for Viewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let principal = principal_of(req);
        let user = match principal.user_id() {
            Some(clerk_id) => app_state(req).and_then(|state| {
                state
                    .store
                    .find_user_by_clerk_id(clerk_id)
                    .map_err(AppError::from)
            }),
            None => Ok(None),
        };
        ready(user.map(|user| Viewer { principal, user }))
    }
}
