use actix_web::web;

use crate::handlers::stat_handlers::catalog_stats;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/stats").route("", web::get().to(catalog_stats)));
}
