use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web::Data,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::constants::middleware_constants::{ACTIVE_SESSION_STATUS, AUTHORIZATION_SCHEME};
use crate::identity::IdentityProvider;
use crate::models::session_models::Principal;
use crate::state::AppState;
use crate::utils::token_utils::session_id_from_token;

/// Resolves the bearer token of a request into a [`Principal`].
///
/// Never fails: anything short of a live session is [`Principal::Anonymous`].
pub async fn verify_principal(identity: &dyn IdentityProvider, authorization: Option<&str>) -> Principal {
    let Some(token) = authorization.and_then(|value| value.strip_prefix(AUTHORIZATION_SCHEME)) else {
        tracing::debug!("no bearer token on request");
        return Principal::Anonymous;
    };

    let Some(session_id) = session_id_from_token(token.trim()) else {
        tracing::warn!("bearer token could not be decoded or has no session id");
        return Principal::Anonymous;
    };

    match identity.get_session(&session_id).await {
        Ok(session) if session.status == ACTIVE_SESSION_STATUS => {
            tracing::debug!(user_id = %session.user_id, session_id = %session.id, "session verified");
            Principal::Authenticated {
                user_id: session.user_id,
                session_id: session.id,
            }
        }
        Ok(session) => {
            tracing::warn!(session_id = %session.id, status = %session.status, "session is not active");
            Principal::Anonymous
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "session lookup failed");
            Principal::Anonymous
        }
    }
}

/// Attaches a [`Principal`] to every request. Gating happens later, in extractors.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let identity = req
            .app_data::<Data<AppState>>()
            .map(|state| state.identity.clone());
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let principal = match identity {
                Some(identity) => verify_principal(identity.as_ref(), authorization.as_deref()).await,
                None => Principal::Anonymous,
            };
            req.extensions_mut().insert(principal);

            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::identity::IdentityError;
    use crate::models::session_models::{SessionRecord, UserProfile};
    use crate::models::token_models::SessionClaims;

    struct OneSession {
        status: &'static str,
    }

    #[async_trait]
    impl IdentityProvider for OneSession {
        async fn get_session(&self, session_id: &str) -> Result<SessionRecord, IdentityError> {
            if session_id != "sess_1" {
                return Err(IdentityError::NotFound(session_id.to_string()));
            }
            Ok(SessionRecord {
                id: "sess_1".into(),
                user_id: "user_1".into(),
                status: self.status.into(),
            })
        }

        async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
            Err(IdentityError::NotFound(user_id.to_string()))
        }
    }

    fn bearer(sid: &str) -> String {
        let claims = SessionClaims { sid: Some(sid.into()), ..Default::default() };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"k")).unwrap();
        format!("Bearer {token}")
    }

    #[actix_web::test]
    async fn active_session_authenticates() {
        let identity = OneSession { status: "active" };
        let principal = verify_principal(&identity, Some(&bearer("sess_1"))).await;
        assert_eq!(
            principal,
            Principal::Authenticated { user_id: "user_1".into(), session_id: "sess_1".into() }
        );
    }

    #[actix_web::test]
    async fn everything_else_is_anonymous() {
        let active = OneSession { status: "active" };
        let revoked = OneSession { status: "revoked" };

        assert!(verify_principal(&active, None).await.is_anonymous());
        assert!(verify_principal(&active, Some("Basic abc")).await.is_anonymous());
        assert!(verify_principal(&active, Some("Bearer not-a-token")).await.is_anonymous());
        assert!(verify_principal(&active, Some(&bearer("sess_unknown"))).await.is_anonymous());
        assert!(verify_principal(&revoked, Some(&bearer("sess_1"))).await.is_anonymous());
    }
}
