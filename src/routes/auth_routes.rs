use actix_web::web;

use crate::handlers::auth_handlers::auth_callback;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/callback", web::post().to(auth_callback)));
}
