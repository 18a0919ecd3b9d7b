use actix_web::web;

use crate::handlers::favorite_handlers::{add_favorite, check_favorite, list_favorites, remove_favorite};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("", web::get().to(list_favorites))
            .route("", web::post().to(add_favorite))
            .route("/{song_id}/check", web::get().to(check_favorite))
            .route("/{song_id}", web::delete().to(remove_favorite)),
    );
}
