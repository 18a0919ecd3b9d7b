use actix_web::web;

use crate::handlers::album_handlers::{get_album, list_albums};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/albums")
            .route("", web::get().to(list_albums))
            .route("/{album_id}", web::get().to(get_album)),
    );
}
