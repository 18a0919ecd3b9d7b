use actix_web::web;

use crate::handlers::song_handlers::{
    featured_songs, increment_play_count, list_songs, made_for_you_songs, trending_songs,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/songs")
            .route("", web::get().to(list_songs))
            .route("/featured", web::get().to(featured_songs))
            .route("/made-for-you", web::get().to(made_for_you_songs))
            .route("/trending", web::get().to(trending_songs))
            .route("/{song_id}/play", web::post().to(increment_play_count)),
    );
}
