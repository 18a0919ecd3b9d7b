use std::path::PathBuf;
use std::sync::Arc;

use crate::identity::IdentityProvider;
use crate::media::MediaStorage;
use crate::store::CatalogStore;

/// Settings the handlers need at request time.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub admin_email: Option<String>,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// Shared through `web::Data`; every collaborator is `Send + Sync`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub media: Arc<dyn MediaStorage>,
    pub settings: AppSettings,
}
