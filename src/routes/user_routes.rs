use actix_web::web;

use crate::handlers::user_handlers::{current_user, get_messages, list_users, send_message};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/me", web::get().to(current_user))
            .route("/messages/{user_id}", web::get().to(get_messages))
            .route("/messages/{user_id}", web::post().to(send_message)),
    );
}
