use diesel::dsl::{count_distinct, exists, max};
use diesel::mysql::Mysql;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Double;

use crate::db::{get_conn, DbConn, DbPool};
use crate::models::album_models::{Album, AlbumChanges, NewAlbum};
use crate::models::favorite_models::{Favorite, NewFavorite};
use crate::models::message_models::{Message, NewMessage};
use crate::models::playlist_models::{NewPlaylist, NewPlaylistSong, Playlist, PlaylistChanges};
use crate::models::song_models::{NewSong, Song, SongChanges};
use crate::models::stat_models::CatalogStats;
use crate::models::user_models::{NewUser, Role, User};
use crate::schema::{albums, favorites, messages, playlist_songs, playlists, songs, users};
use crate::store::{CatalogStore, StoreError, StoreResult};
use crate::utils::approval_utils::Visibility;

define_sql_function! {
    #[sql_name = "RAND"]
    fn random_order() -> Double;
}

pub struct MysqlStore {
    pool: DbPool,
}

impl MysqlStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> StoreResult<DbConn> {
        Ok(get_conn(&self.pool)?)
    }
}

fn map_unique(err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => StoreError::Duplicate,
        other => StoreError::Query(other),
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn visible_songs<'a>(visibility: Visibility) -> songs::BoxedQuery<'a, Mysql> {
    let query = songs::table.into_boxed();
    match visibility {
        Visibility::Everything => query,
        Visibility::ApprovedOnly => {
            query.filter(songs::is_approved.is_null().or(songs::is_approved.eq(true)))
        }
    }
}

fn visible_albums<'a>(visibility: Visibility) -> albums::BoxedQuery<'a, Mysql> {
    let query = albums::table.into_boxed();
    match visibility {
        Visibility::Everything => query,
        Visibility::ApprovedOnly => {
            query.filter(albums::is_approved.is_null().or(albums::is_approved.eq(true)))
        }
    }
}

fn fetch_song(conn: &mut MysqlConnection, song_id: &str) -> QueryResult<Option<Song>> {
    songs::table.find(song_id).first::<Song>(conn).optional()
}

fn fetch_album(conn: &mut MysqlConnection, album_id: &str) -> QueryResult<Option<Album>> {
    albums::table.find(album_id).first::<Album>(conn).optional()
}

fn fetch_owned_playlist(
    conn: &mut MysqlConnection,
    playlist_id: &str,
    owner_id: &str,
) -> QueryResult<Option<Playlist>> {
    playlists::table
        .filter(playlists::id.eq(playlist_id))
        .filter(playlists::user_id.eq(owner_id))
        .first::<Playlist>(conn)
        .optional()
}

impl CatalogStore for MysqlStore {
    // --------------------- Users ---------------------
    fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn()?;
        Ok(users::table.find(user_id).first::<User>(&mut conn).optional()?)
    }

    fn find_user_by_clerk_id(&self, clerk_id: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn()?;
        Ok(users::table
            .filter(users::clerk_id.eq(clerk_id))
            .first::<User>(&mut conn)
            .optional()?)
    }

    fn upsert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut conn = self.conn()?;
        let existing = users::table
            .filter(users::clerk_id.eq(&user.clerk_id))
            .first::<User>(&mut conn)
            .optional()?;
        if let Some(existing) = existing {
            return Ok(existing);
        }

        // A concurrent first request may win the insert; the unique key keeps one row.
        match diesel::insert_into(users::table).values(&user).execute(&mut conn) {
            Ok(_) | Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(users::table
            .filter(users::clerk_id.eq(&user.clerk_id))
            .first::<User>(&mut conn)?)
    }

    fn set_user_role(&self, user_id: &str, role: Role) -> StoreResult<Option<User>> {
        let mut conn = self.conn()?;
        diesel::update(users::table.find(user_id))
            .set((users::role.eq(role), users::updated_at.eq(now())))
            .execute(&mut conn)?;
        Ok(users::table.find(user_id).first::<User>(&mut conn).optional()?)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut conn = self.conn()?;
        Ok(users::table
            .order(users::created_at.desc())
            .load::<User>(&mut conn)?)
    }

    fn delete_user(&self, user_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(users::table.find(user_id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    // --------------------- Songs ---------------------
    fn list_songs(&self, visibility: Visibility) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(visible_songs(visibility)
            .order(songs::created_at.desc())
            .load::<Song>(&mut conn)?)
    }

    fn sample_songs(&self, visibility: Visibility, size: usize) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(visible_songs(visibility)
            .order(random_order())
            .limit(size as i64)
            .load::<Song>(&mut conn)?)
    }

    fn top_played_songs(&self, visibility: Visibility, limit: usize) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(visible_songs(visibility)
            .order(songs::play_count.desc())
            .limit(limit as i64)
            .load::<Song>(&mut conn)?)
    }

    fn find_song(&self, song_id: &str) -> StoreResult<Option<Song>> {
        let mut conn = self.conn()?;
        Ok(fetch_song(&mut conn, song_id)?)
    }

    fn insert_song(&self, song: NewSong) -> StoreResult<Song> {
        let mut conn = self.conn()?;
        diesel::insert_into(songs::table)
            .values(&song)
            .execute(&mut conn)
            .map_err(map_unique)?;
        Ok(songs::table.find(song.id.as_str()).first::<Song>(&mut conn)?)
    }

    fn update_song(&self, song_id: &str, changes: SongChanges) -> StoreResult<Option<Song>> {
        let mut conn = self.conn()?;
        diesel::update(songs::table.find(song_id))
            .set(&changes)
            .execute(&mut conn)?;
        Ok(fetch_song(&mut conn, song_id)?)
    }

    fn delete_song(&self, song_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(songs::table.find(song_id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn set_song_approval(&self, song_id: &str, approved: bool) -> StoreResult<Option<Song>> {
        let mut conn = self.conn()?;
        diesel::update(songs::table.find(song_id))
            .set((songs::is_approved.eq(approved), songs::updated_at.eq(now())))
            .execute(&mut conn)?;
        Ok(fetch_song(&mut conn, song_id)?)
    }

    fn approve_unmoderated_songs(&self) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        let changed = diesel::update(
            songs::table.filter(songs::is_approved.is_null().or(songs::is_approved.eq(false))),
        )
        .set((songs::is_approved.eq(true), songs::updated_at.eq(now())))
        .execute(&mut conn)?;
        Ok(changed)
    }

    fn increment_play_count(&self, song_id: &str) -> StoreResult<Option<Song>> {
        let mut conn = self.conn()?;
        diesel::update(songs::table.find(song_id))
            .set((songs::play_count.eq(songs::play_count + 1), songs::updated_at.eq(now())))
            .execute(&mut conn)?;
        Ok(fetch_song(&mut conn, song_id)?)
    }

    fn pending_songs(&self) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(songs::table
            .filter(songs::is_approved.eq(false))
            .order(songs::created_at.desc())
            .load::<Song>(&mut conn)?)
    }

    fn songs_uploaded_by(&self, user_id: &str) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(songs::table
            .filter(songs::uploaded_by.eq(user_id))
            .order(songs::created_at.desc())
            .load::<Song>(&mut conn)?)
    }

    fn album_songs(&self, album_id: &str, visibility: Visibility) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(visible_songs(visibility)
            .filter(songs::album_id.eq(album_id))
            .order(songs::created_at.asc())
            .load::<Song>(&mut conn)?)
    }

    // --------------------- Albums ---------------------
    fn list_albums(&self, visibility: Visibility) -> StoreResult<Vec<Album>> {
        let mut conn = self.conn()?;
        Ok(visible_albums(visibility)
            .order(albums::created_at.desc())
            .load::<Album>(&mut conn)?)
    }

    fn find_album(&self, album_id: &str) -> StoreResult<Option<Album>> {
        let mut conn = self.conn()?;
        Ok(fetch_album(&mut conn, album_id)?)
    }

    fn insert_album(&self, album: NewAlbum) -> StoreResult<Album> {
        let mut conn = self.conn()?;
        diesel::insert_into(albums::table)
            .values(&album)
            .execute(&mut conn)
            .map_err(map_unique)?;
        Ok(albums::table.find(album.id.as_str()).first::<Album>(&mut conn)?)
    }

    fn update_album(&self, album_id: &str, changes: AlbumChanges) -> StoreResult<Option<Album>> {
        let mut conn = self.conn()?;
        diesel::update(albums::table.find(album_id))
            .set(&changes)
            .execute(&mut conn)?;
        Ok(fetch_album(&mut conn, album_id)?)
    }

    fn delete_album_with_songs(&self, album_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            if fetch_album(conn, album_id)?.is_none() {
                return Ok(false);
            }
            let removed_songs =
                diesel::delete(songs::table.filter(songs::album_id.eq(album_id))).execute(conn)?;
            diesel::delete(albums::table.find(album_id)).execute(conn)?;
            tracing::debug!(album_id, removed_songs, "album deleted with member songs");
            Ok(true)
        })
    }

    fn set_album_approval(&self, album_id: &str, approved: bool) -> StoreResult<Option<Album>> {
        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let timestamp = now();
            diesel::update(albums::table.find(album_id))
                .set((albums::is_approved.eq(approved), albums::updated_at.eq(timestamp)))
                .execute(conn)?;
            let Some(album) = fetch_album(conn, album_id)? else {
                return Ok(None);
            };

            if approved {
                diesel::update(songs::table.filter(songs::album_id.eq(album_id)))
                    .set((songs::is_approved.eq(true), songs::updated_at.eq(timestamp)))
                    .execute(conn)?;
            }
            Ok(Some(album))
        })
    }

    fn pending_albums(&self) -> StoreResult<Vec<Album>> {
        let mut conn = self.conn()?;
        Ok(albums::table
            .filter(albums::is_approved.eq(false))
            .order(albums::created_at.desc())
            .load::<Album>(&mut conn)?)
    }

    fn albums_uploaded_by(&self, user_id: &str) -> StoreResult<Vec<Album>> {
        let mut conn = self.conn()?;
        Ok(albums::table
            .filter(albums::uploaded_by.eq(user_id))
            .order(albums::created_at.desc())
            .load::<Album>(&mut conn)?)
    }

    // --------------------- Playlists ---------------------
    fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
        let mut conn = self.conn()?;
        diesel::insert_into(playlists::table)
            .values(&playlist)
            .execute(&mut conn)?;
        Ok(playlists::table
            .find(playlist.id.as_str())
            .first::<Playlist>(&mut conn)?)
    }

    fn playlists_owned_by(&self, owner_id: &str) -> StoreResult<Vec<Playlist>> {
        let mut conn = self.conn()?;
        Ok(playlists::table
            .filter(playlists::user_id.eq(owner_id))
            .order(playlists::created_at.desc())
            .load::<Playlist>(&mut conn)?)
    }

    fn find_playlist(&self, playlist_id: &str, owner_id: &str) -> StoreResult<Option<Playlist>> {
        let mut conn = self.conn()?;
        Ok(fetch_owned_playlist(&mut conn, playlist_id, owner_id)?)
    }

    fn update_playlist(
        &self,
        playlist_id: &str,
        owner_id: &str,
        changes: PlaylistChanges,
    ) -> StoreResult<Option<Playlist>> {
        let mut conn = self.conn()?;
        diesel::update(
            playlists::table
                .filter(playlists::id.eq(playlist_id))
                .filter(playlists::user_id.eq(owner_id)),
        )
        .set(&changes)
        .execute(&mut conn)?;
        Ok(fetch_owned_playlist(&mut conn, playlist_id, owner_id)?)
    }

    fn delete_playlist(&self, playlist_id: &str, owner_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            let deleted = diesel::delete(
                playlists::table
                    .filter(playlists::id.eq(playlist_id))
                    .filter(playlists::user_id.eq(owner_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Ok(false);
            }
            diesel::delete(playlist_songs::table.filter(playlist_songs::playlist_id.eq(playlist_id)))
                .execute(conn)?;
            Ok(true)
        })
    }

    fn playlist_songs(&self, playlist_id: &str) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(playlist_songs::table
            .inner_join(songs::table.on(songs::id.eq(playlist_songs::song_id)))
            .filter(playlist_songs::playlist_id.eq(playlist_id))
            .order(playlist_songs::position.asc())
            .select(songs::all_columns)
            .load::<Song>(&mut conn)?)
    }

    fn add_playlist_song(&self, playlist_id: &str, song_id: &str) -> StoreResult<()> {
        let mut conn = self.conn()?;
        conn.transaction::<_, StoreError, _>(|conn| {
            // Serializes concurrent appends to the same playlist so positions stay distinct.
            playlists::table
                .find(playlist_id)
                .select(playlists::id)
                .for_update()
                .load::<String>(conn)?;

            let last_position = playlist_songs::table
                .filter(playlist_songs::playlist_id.eq(playlist_id))
                .select(max(playlist_songs::position))
                .first::<Option<i32>>(conn)?;

            let timestamp = now();
            let entry = NewPlaylistSong {
                playlist_id: playlist_id.to_owned(),
                song_id: song_id.to_owned(),
                position: last_position.map_or(0, |p| p + 1),
                added_at: timestamp,
            };
            diesel::insert_into(playlist_songs::table)
                .values(&entry)
                .execute(conn)
                .map_err(map_unique)?;

            diesel::update(playlists::table.find(playlist_id))
                .set(playlists::updated_at.eq(timestamp))
                .execute(conn)?;
            Ok(())
        })
    }

    fn remove_playlist_song(&self, playlist_id: &str, song_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(playlist_songs::table.find((playlist_id, song_id)))
            .execute(&mut conn)?;
        Ok(removed > 0)
    }

    // --------------------- Favorites ---------------------
    fn insert_favorite(&self, favorite: NewFavorite) -> StoreResult<Favorite> {
        let mut conn = self.conn()?;
        diesel::insert_into(favorites::table)
            .values(&favorite)
            .execute(&mut conn)
            .map_err(map_unique)?;
        Ok(favorites::table
            .find(favorite.id.as_str())
            .first::<Favorite>(&mut conn)?)
    }

    fn delete_favorite(&self, owner_id: &str, song_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(owner_id))
                .filter(favorites::song_id.eq(song_id)),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn favorite_songs(&self, owner_id: &str) -> StoreResult<Vec<Song>> {
        let mut conn = self.conn()?;
        Ok(favorites::table
            .inner_join(songs::table.on(songs::id.eq(favorites::song_id)))
            .filter(favorites::user_id.eq(owner_id))
            .order(favorites::created_at.asc())
            .select(songs::all_columns)
            .load::<Song>(&mut conn)?)
    }

    fn is_favorite(&self, owner_id: &str, song_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(diesel::select(exists(
            favorites::table
                .filter(favorites::user_id.eq(owner_id))
                .filter(favorites::song_id.eq(song_id)),
        ))
        .get_result::<bool>(&mut conn)?)
    }

    // --------------------- Messages ---------------------
    fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut conn = self.conn()?;
        diesel::insert_into(messages::table)
            .values(&message)
            .execute(&mut conn)?;
        Ok(messages::table
            .find(message.id.as_str())
            .first::<Message>(&mut conn)?)
    }

    fn conversation(&self, user_a: &str, user_b: &str) -> StoreResult<Vec<Message>> {
        let mut conn = self.conn()?;
        Ok(messages::table
            .filter(
                messages::sender_id
                    .eq(user_a)
                    .and(messages::receiver_id.eq(user_b))
                    .or(messages::sender_id.eq(user_b).and(messages::receiver_id.eq(user_a))),
            )
            .order(messages::created_at.asc())
            .load::<Message>(&mut conn)?)
    }

    // --------------------- Stats ---------------------
    fn catalog_stats(&self) -> StoreResult<CatalogStats> {
        let mut conn = self.conn()?;
        let total_songs = songs::table.count().get_result::<i64>(&mut conn)?;
        let total_albums = albums::table.count().get_result::<i64>(&mut conn)?;
        let total_users = users::table.count().get_result::<i64>(&mut conn)?;
        let total_artists = songs::table
            .select(count_distinct(songs::artist))
            .first::<i64>(&mut conn)?;

        Ok(CatalogStats {
            total_songs,
            total_albums,
            total_users,
            total_artists,
        })
    }
}
