pub mod admin_routes;
pub mod album_routes;
pub mod artist_routes;
pub mod auth_routes;
pub mod favorite_routes;
pub mod playlist_routes;
pub mod song_routes;
pub mod stat_routes;
pub mod user_routes;

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::error::AppError;
use crate::models::MessageResponse;

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::new("Not Found"))
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(format!("Invalid JSON body: {err}")).into()
}

/// Registers `/health` and every API route under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .configure(song_routes::configure)
                .configure(album_routes::configure)
                .configure(admin_routes::configure)
                .configure(artist_routes::configure)
                .configure(playlist_routes::configure)
                .configure(favorite_routes::configure)
                .configure(user_routes::configure)
                .configure(auth_routes::configure)
                .configure(stat_routes::configure),
        )
        .default_service(web::to(not_found));
}
