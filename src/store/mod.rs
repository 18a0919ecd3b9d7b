//! Persistence boundary for the catalog.
//!
//! Handlers only talk to [`CatalogStore`]. `MysqlStore` is the production
//! backend; `MemoryStore` keeps everything in process for local runs and tests.

pub mod memory;
pub mod mysql;

use crate::models::album_models::{Album, AlbumChanges, NewAlbum};
use crate::models::favorite_models::{Favorite, NewFavorite};
use crate::models::message_models::{Message, NewMessage};
use crate::models::playlist_models::{NewPlaylist, Playlist, PlaylistChanges};
use crate::models::song_models::{NewSong, Song, SongChanges};
use crate::models::stat_models::CatalogStats;
use crate::models::user_models::{NewUser, Role, User};
use crate::utils::approval_utils::Visibility;

pub use memory::MemoryStore;
pub use mysql::MysqlStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database connection error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("database query error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("duplicate entry")]
    Duplicate,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lists are returned newest first unless stated otherwise. Lookups of
/// missing rows yield `Ok(None)` / `Ok(false)`, never an error.
pub trait CatalogStore: Send + Sync {
    // --------------------- Users ---------------------
    fn find_user(&self, user_id: &str) -> StoreResult<Option<User>>;
    fn find_user_by_clerk_id(&self, clerk_id: &str) -> StoreResult<Option<User>>;
    /// Inserts the user unless one with the same external id exists; returns the stored row either way.
    fn upsert_user(&self, user: NewUser) -> StoreResult<User>;
    fn set_user_role(&self, user_id: &str, role: Role) -> StoreResult<Option<User>>;
    fn list_users(&self) -> StoreResult<Vec<User>>;
    fn delete_user(&self, user_id: &str) -> StoreResult<bool>;

    // --------------------- Songs ---------------------
    fn list_songs(&self, visibility: Visibility) -> StoreResult<Vec<Song>>;
    /// Uniform random sample of at most `size` songs.
    fn sample_songs(&self, visibility: Visibility, size: usize) -> StoreResult<Vec<Song>>;
    /// Most played first; order among equal play counts is unspecified.
    fn top_played_songs(&self, visibility: Visibility, limit: usize) -> StoreResult<Vec<Song>>;
    fn find_song(&self, song_id: &str) -> StoreResult<Option<Song>>;
    fn insert_song(&self, song: NewSong) -> StoreResult<Song>;
    fn update_song(&self, song_id: &str, changes: SongChanges) -> StoreResult<Option<Song>>;
    /// Playlist entries and favorites pointing at the song are left in place.
    fn delete_song(&self, song_id: &str) -> StoreResult<bool>;
    fn set_song_approval(&self, song_id: &str, approved: bool) -> StoreResult<Option<Song>>;
    /// Marks every song whose flag is missing or `false` as approved. Returns the number changed.
    fn approve_unmoderated_songs(&self) -> StoreResult<usize>;
    fn increment_play_count(&self, song_id: &str) -> StoreResult<Option<Song>>;
    fn pending_songs(&self) -> StoreResult<Vec<Song>>;
    fn songs_uploaded_by(&self, user_id: &str) -> StoreResult<Vec<Song>>;
    /// Member songs of an album in insertion order.
    fn album_songs(&self, album_id: &str, visibility: Visibility) -> StoreResult<Vec<Song>>;

    // --------------------- Albums ---------------------
    fn list_albums(&self, visibility: Visibility) -> StoreResult<Vec<Album>>;
    fn find_album(&self, album_id: &str) -> StoreResult<Option<Album>>;
    fn insert_album(&self, album: NewAlbum) -> StoreResult<Album>;
    fn update_album(&self, album_id: &str, changes: AlbumChanges) -> StoreResult<Option<Album>>;
    /// Deletes the album and all of its member songs atomically.
    fn delete_album_with_songs(&self, album_id: &str) -> StoreResult<bool>;
    /// Approving also approves every member song; rejecting leaves songs untouched.
    fn set_album_approval(&self, album_id: &str, approved: bool) -> StoreResult<Option<Album>>;
    fn pending_albums(&self) -> StoreResult<Vec<Album>>;
    fn albums_uploaded_by(&self, user_id: &str) -> StoreResult<Vec<Album>>;

    // --------------------- Playlists ---------------------
    fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist>;
    fn playlists_owned_by(&self, owner_id: &str) -> StoreResult<Vec<Playlist>>;
    fn find_playlist(&self, playlist_id: &str, owner_id: &str) -> StoreResult<Option<Playlist>>;
    fn update_playlist(
        &self,
        playlist_id: &str,
        owner_id: &str,
        changes: PlaylistChanges,
    ) -> StoreResult<Option<Playlist>>;
    fn delete_playlist(&self, playlist_id: &str, owner_id: &str) -> StoreResult<bool>;
    /// Songs of a playlist in the order they were added; entries whose song is gone are skipped.
    fn playlist_songs(&self, playlist_id: &str) -> StoreResult<Vec<Song>>;
    /// Appends a song. Fails with [`StoreError::Duplicate`] when it is already present.
    fn add_playlist_song(&self, playlist_id: &str, song_id: &str) -> StoreResult<()>;
    fn remove_playlist_song(&self, playlist_id: &str, song_id: &str) -> StoreResult<bool>;

    // --------------------- Favorites ---------------------
    /// Fails with [`StoreError::Duplicate`] when the pair already exists.
    fn insert_favorite(&self, favorite: NewFavorite) -> StoreResult<Favorite>;
    fn delete_favorite(&self, owner_id: &str, song_id: &str) -> StoreResult<bool>;
    /// Favorited songs, oldest favorite first; favorites whose song is gone are skipped.
    fn favorite_songs(&self, owner_id: &str) -> StoreResult<Vec<Song>>;
    fn is_favorite(&self, owner_id: &str, song_id: &str) -> StoreResult<bool>;

    // --------------------- Messages ---------------------
    fn insert_message(&self, message: NewMessage) -> StoreResult<Message>;
    /// Messages exchanged between two users, oldest first.
    fn conversation(&self, user_a: &str, user_b: &str) -> StoreResult<Vec<Message>>;

    // --------------------- Stats ---------------------
    fn catalog_stats(&self) -> StoreResult<CatalogStats>;
}
