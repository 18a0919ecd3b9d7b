use actix_web::web;

use crate::handlers::admin_handlers::{
    approve_album, approve_all_existing_songs, approve_song, check_admin, create_album, create_song,
    delete_album, delete_song, delete_user, get_user, list_users, pending_albums, pending_songs, reject_album,
    reject_song, update_album, update_song, update_user,
};

// Literal segments are registered before `{id}` so they are not captured by it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/check", web::get().to(check_admin))
            // Songs
            .route("/songs/approve-all-existing", web::post().to(approve_all_existing_songs))
            .route("/songs/pending", web::get().to(pending_songs))
            .route("/songs", web::post().to(create_song))
            .route("/songs/{id}", web::put().to(update_song))
            .route("/songs/{id}", web::delete().to(delete_song))
            .route("/songs/{id}/approve", web::post().to(approve_song))
            .route("/songs/{id}/reject", web::post().to(reject_song))
            // Albums
            .route("/albums/pending", web::get().to(pending_albums))
            .route("/albums", web::post().to(create_album))
            .route("/albums/{id}", web::put().to(update_album))
            .route("/albums/{id}", web::delete().to(delete_album))
            .route("/albums/{id}/approve", web::post().to(approve_album))
            .route("/albums/{id}/reject", web::post().to(reject_album))
            // Users
            .route("/users", web::get().to(list_users))
            .route("/users/{id}", web::get().to(get_user))
            .route("/users/{id}", web::put().to(update_user))
            .route("/users/{id}", web::delete().to(delete_user)),
    );
}
