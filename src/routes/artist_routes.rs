use actix_web::web;

use crate::handlers::artist_handlers::{my_uploads, upload_album, upload_song};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/artist")
            .route("/songs", web::post().to(upload_song))
            .route("/albums", web::post().to(upload_album))
            .route("/uploads", web::get().to(my_uploads)),
    );
}
