pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod logging;
pub mod media;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod utils;
