use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::identity::{IdentityError, IdentityProvider};
use crate::models::session_models::{SessionRecord, UserProfile};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend API client for a Clerk-style identity provider.
pub struct ClerkClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct EmailAddress {
    id: String,
    email_address: String,
}

#[derive(Deserialize)]
struct ClerkUser {
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
}

impl From<ClerkUser> for UserProfile {
    fn from(user: ClerkUser) -> Self {
        let primary_email = user.primary_email_address_id.as_deref().and_then(|primary| {
            user.email_addresses
                .iter()
                .find(|address| address.id == primary)
                .map(|address| address.email_address.clone())
        });

        UserProfile {
            first_name: user.first_name,
            last_name: user.last_name,
            image_url: user.image_url,
            primary_email,
        }
    }
}

/// Ids are interpolated into URL paths, so only the provider's id alphabet is accepted.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ClerkClient {
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<T, IdentityError> {
        if !is_safe_id(id) {
            return Err(IdentityError::NotFound(id.to_string()));
        }

        let response = self
            .http
            .get(format!("{}/{}/{}", self.api_url, resource, id))
            .bearer_auth(&self.secret_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(IdentityError::NotFound(id.to_string())),
            status if !status.is_success() => Err(IdentityError::Status(status.as_u16())),
            _ => Ok(response.json::<T>().await?),
        }
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn get_session(&self, session_id: &str) -> Result<SessionRecord, IdentityError> {
        self.get_json::<SessionRecord>("sessions", session_id).await
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        let user = self.get_json::<ClerkUser>("users", user_id).await?;
        Ok(user.into())
    }
}
