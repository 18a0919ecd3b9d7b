#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::http::header;
use actix_web::web;
use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};

use melody::identity::{IdentityError, IdentityProvider};
use melody::media::{MediaError, MediaKind, MediaStorage};
use melody::models::session_models::{SessionRecord, UserProfile};
use melody::models::token_models::SessionClaims;
use melody::models::user_models::{NewUser, Role};
use melody::state::{AppSettings, AppState};
use melody::store::{CatalogStore, MemoryStore};
use melody::utils::file_utils::StagedFile;

pub const ADMIN_EMAIL: &str = "admin@melody.test";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

pub const ADMIN: &str = "user_admin";
pub const ARTIST: &str = "user_artist";
pub const FAN: &str = "user_fan";
pub const OTHER_FAN: &str = "user_other";
pub const NEWCOMER: &str = "user_new";

/// Session directory and profiles held in memory.
pub struct FakeIdentity {
    sessions: HashMap<String, SessionRecord>,
    profiles: HashMap<String, UserProfile>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        let mut identity = Self { sessions: HashMap::new(), profiles: HashMap::new() };
        for (user_id, email) in [
            (ADMIN, ADMIN_EMAIL),
            (ARTIST, "artist@melody.test"),
            (FAN, "fan@melody.test"),
            (OTHER_FAN, "other@melody.test"),
            (NEWCOMER, "new@melody.test"),
        ] {
            identity.add_session(&session_of(user_id), user_id, "active");
            identity.profiles.insert(
                user_id.to_string(),
                UserProfile {
                    first_name: Some("Test".into()),
                    last_name: Some(user_id.into()),
                    image_url: Some(format!("https://img.test/{user_id}.png")),
                    primary_email: Some(email.into()),
                },
            );
        }
        identity.add_session("sess_revoked", FAN, "revoked");
        identity
    }

    pub fn add_session(&mut self, session_id: &str, user_id: &str, status: &str) {
        self.sessions.insert(
            session_id.to_string(),
            SessionRecord {
                id: session_id.to_string(),
                user_id: user_id.to_string(),
                status: status.to_string(),
            },
        );
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn get_session(&self, session_id: &str) -> Result<SessionRecord, IdentityError> {
        self.sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(session_id.to_string()))
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, IdentityError> {
        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(user_id.to_string()))
    }
}

/// Hands out predictable URLs and counts uploads.
#[derive(Default)]
pub struct FakeMedia {
    uploads: AtomicUsize,
}

impl FakeMedia {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaStorage for FakeMedia {
    async fn upload(&self, kind: MediaKind, file: &StagedFile) -> Result<String, MediaError> {
        assert!(file.path().exists(), "staged file must exist while uploading");
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://media.test/{}/{n}", kind.folder()))
    }
}

pub struct Harness {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryStore>,
    pub media: Arc<FakeMedia>,
    pub upload_dir: tempfile::TempDir,
}

impl Harness {
    /// Fresh catalog with an artist already promoted. Other users are created on first sight.
    pub fn new() -> Self {
        Self::with_identity(FakeIdentity::new())
    }

    pub fn with_identity(identity: FakeIdentity) -> Self {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_user(NewUser::new(ARTIST, "Test Artist".into(), String::new(), Role::Artist))
            .unwrap();

        let media = Arc::new(FakeMedia::default());
        let upload_dir = tempfile::tempdir().unwrap();
        let state = web::Data::new(AppState {
            store: store.clone(),
            identity: Arc::new(identity),
            media: media.clone(),
            settings: AppSettings {
                admin_email: Some(ADMIN_EMAIL.to_string()),
                upload_dir: upload_dir.path().to_path_buf(),
                max_upload_bytes: 1024,
            },
        });

        Self { state, store, media, upload_dir }
    }
}

pub fn session_of(user_id: &str) -> String {
    format!("sess_{user_id}")
}

/// A session token as the frontend would send it. The signature is never checked.
pub fn token_for_session(session_id: &str) -> String {
    let claims = SessionClaims {
        sid: Some(session_id.to_string()),
        sub: None,
        exp: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"not-the-real-key")).unwrap()
}

pub fn bearer(user_id: &str) -> (header::HeaderName, String) {
    bearer_for_session(&session_of(user_id))
}

pub fn bearer_for_session(session_id: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token_for_session(session_id)))
}

const BOUNDARY: &str = "----melody-test-boundary";

/// Encodes a multipart/form-data body. Returns the content type header and the body.
pub fn multipart(texts: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> ((header::HeaderName, String), Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let content_type = (header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    (content_type, body)
}

/// Builds the full application around a harness, as `main` does.
macro_rules! test_app {
    ($harness:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($harness.state.clone())
                .wrap(melody::middleware::session_middleware::SessionMiddleware)
                .wrap(melody::middleware::cors::frontend_cors(helpers::FRONTEND_ORIGIN))
                .configure(melody::routes::configure),
        )
        .await
    };
}
