use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use serde::Deserialize;

/// Identity attached to every request by the session middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Authenticated { user_id: String, session_id: String },
    Anonymous,
}

impl Principal {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Principal::Authenticated { user_id, .. } => Some(user_id),
            Principal::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Requests that bypassed the middleware are treated as anonymous.
        let principal = req
            .extensions()
            .get::<Principal>()
            .cloned()
            .unwrap_or(Principal::Anonymous);
        ready(Ok(principal))
    }
}

/// Session record as reported by the identity provider.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    pub status: String,
}

/// Profile fields used to materialize a local user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub primary_email: Option<String>,
}
