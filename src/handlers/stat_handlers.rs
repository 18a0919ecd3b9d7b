use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::middleware::auth_gates::AdminUser;
use crate::state::AppState;

pub async fn catalog_stats(_admin: AdminUser, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.catalog_stats()?))
}
