pub mod admin_handlers;
pub mod album_handlers;
pub mod artist_handlers;
pub mod auth_handlers;
pub mod favorite_handlers;
pub mod playlist_handlers;
pub mod song_handlers;
pub mod stat_handlers;
pub mod user_handlers;
