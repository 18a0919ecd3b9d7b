use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use clap::Parser;

use melody::config::{Config, StoreBackend};
use melody::db::establish_pool;
use melody::error::set_verbose_errors;
use melody::identity::{ClerkClient, IdentityProvider};
use melody::logging::init_tracing;
use melody::media::{MediaStorage, SftpMediaStorage, UnconfiguredMediaStorage};
use melody::middleware::cors::frontend_cors;
use melody::middleware::session_middleware::SessionMiddleware;
use melody::routes;
use melody::state::{AppSettings, AppState};
use melody::store::{CatalogStore, MemoryStore, MysqlStore};
use melody::utils::file_utils::spawn_upload_sweeper;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_tracing(&config.log_level)?;
    set_verbose_errors(!config.is_production());

    let store: Arc<dyn CatalogStore> = match config.store {
        StoreBackend::Mysql => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set for the mysql store")?;
            let pool = establish_pool(database_url, config.pool_size).context("Failed to create DB pool")?;
            Arc::new(MysqlStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(ClerkClient::new(config.clerk_api_url.clone(), config.clerk_secret_key.clone()));

    let media: Arc<dyn MediaStorage> = match config.sftp.to_config() {
        Some(sftp) => Arc::new(SftpMediaStorage::new(sftp)),
        None => {
            tracing::warn!("SFTP media storage not configured, uploads will fail");
            Arc::new(UnconfiguredMediaStorage)
        }
    };

    if config.admin_email.is_none() {
        tracing::warn!("ADMIN_EMAIL not set, no user will be seeded as admin");
    }

    let state = web::Data::new(AppState {
        store,
        identity,
        media,
        settings: AppSettings {
            admin_email: config.admin_email.clone(),
            upload_dir: config.upload_dir.clone(),
            max_upload_bytes: config.upload_max_bytes,
        },
    });

    spawn_upload_sweeper(config.upload_dir.clone(), config.sweep_interval());

    tracing::info!(
        host = %config.host,
        port = config.port,
        store = ?config.store,
        cors_origin = %config.cors_origin,
        "starting server"
    );

    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SessionMiddleware)
            .wrap(frontend_cors(&cors_origin))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .workers(config.workers)
    .run()
    .await?;

    Ok(())
}
