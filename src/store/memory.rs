use std::collections::HashSet;

use parking_lot::RwLock;
use rand::seq::SliceRandom;

use crate::models::album_models::{Album, AlbumChanges, NewAlbum};
use crate::models::favorite_models::{Favorite, NewFavorite};
use crate::models::message_models::{Message, NewMessage};
use crate::models::playlist_models::{NewPlaylist, Playlist, PlaylistChanges, PlaylistSong};
use crate::models::song_models::{NewSong, Song, SongChanges};
use crate::models::stat_models::CatalogStats;
use crate::models::user_models::{NewUser, Role, User};
use crate::store::{CatalogStore, StoreError, StoreResult};
use crate::utils::approval_utils::Visibility;

/// Rows are kept in insertion order, so iterating in reverse yields newest first.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    songs: Vec<Song>,
    albums: Vec<Album>,
    playlists: Vec<Playlist>,
    playlist_songs: Vec<PlaylistSong>,
    favorites: Vec<Favorite>,
    messages: Vec<Message>,
}

impl Tables {
    fn song_mut(&mut self, song_id: &str) -> Option<&mut Song> {
        self.songs.iter_mut().find(|s| s.id == song_id)
    }

    fn album_mut(&mut self, album_id: &str) -> Option<&mut Album> {
        self.albums.iter_mut().find(|a| a.id == album_id)
    }

    fn user_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    fn song(&self, song_id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == song_id)
    }
}

/// Catalog kept entirely in process memory. Every compound operation runs
/// under a single write lock, which makes cascades atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone>(rows: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter().rev().filter(|row| keep(row)).cloned().collect()
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

impl CatalogStore for MemoryStore {
    // --------------------- Users ---------------------
    fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn find_user_by_clerk_id(&self, clerk_id: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.clerk_id == clerk_id).cloned())
    }

    fn upsert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.users.iter().find(|u| u.clerk_id == user.clerk_id) {
            return Ok(existing.clone());
        }
        let stored = User {
            id: user.id,
            clerk_id: user.clerk_id,
            full_name: user.full_name,
            image_url: user.image_url,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        tables.users.push(stored.clone());
        Ok(stored)
    }

    fn set_user_role(&self, user_id: &str, role: Role) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write();
        Ok(tables.user_mut(user_id).map(|user| {
            user.role = Some(role);
            user.updated_at = now();
            user.clone()
        }))
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.users, |_| true))
    }

    fn delete_user(&self, user_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != user_id);
        Ok(tables.users.len() != before)
    }

    // --------------------- Songs ---------------------
    fn list_songs(&self, visibility: Visibility) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.songs, |s| visibility.admits(s.is_approved)))
    }

    fn sample_songs(&self, visibility: Visibility, size: usize) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        let eligible: Vec<&Song> = tables
            .songs
            .iter()
            .filter(|s| visibility.admits(s.is_approved))
            .collect();
        let mut rng = rand::thread_rng();
        Ok(eligible
            .choose_multiple(&mut rng, size)
            .map(|s| (*s).clone())
            .collect())
    }

    fn top_played_songs(&self, visibility: Visibility, limit: usize) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        let mut eligible: Vec<Song> = tables
            .songs
            .iter()
            .filter(|s| visibility.admits(s.is_approved))
            .cloned()
            .collect();
        eligible.sort_by(|a, b| b.play_count.cmp(&a.play_count));
        eligible.truncate(limit);
        Ok(eligible)
    }

    fn find_song(&self, song_id: &str) -> StoreResult<Option<Song>> {
        let tables = self.tables.read();
        Ok(tables.song(song_id).cloned())
    }

    fn insert_song(&self, song: NewSong) -> StoreResult<Song> {
        let mut tables = self.tables.write();
        if tables.song(&song.id).is_some() {
            return Err(StoreError::Duplicate);
        }
        let stored = song.into_song();
        tables.songs.push(stored.clone());
        Ok(stored)
    }

    fn update_song(&self, song_id: &str, changes: SongChanges) -> StoreResult<Option<Song>> {
        let mut tables = self.tables.write();
        Ok(tables.song_mut(song_id).map(|song| {
            changes.apply_to(song);
            song.clone()
        }))
    }

    fn delete_song(&self, song_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.songs.len();
        tables.songs.retain(|s| s.id != song_id);
        Ok(tables.songs.len() != before)
    }

    fn set_song_approval(&self, song_id: &str, approved: bool) -> StoreResult<Option<Song>> {
        let mut tables = self.tables.write();
        Ok(tables.song_mut(song_id).map(|song| {
            song.is_approved = Some(approved);
            song.updated_at = now();
            song.clone()
        }))
    }

    fn approve_unmoderated_songs(&self) -> StoreResult<usize> {
        let mut tables = self.tables.write();
        let timestamp = now();
        let mut changed = 0;
        for song in tables.songs.iter_mut().filter(|s| s.is_approved != Some(true)) {
            song.is_approved = Some(true);
            song.updated_at = timestamp;
            changed += 1;
        }
        Ok(changed)
    }

    fn increment_play_count(&self, song_id: &str) -> StoreResult<Option<Song>> {
        let mut tables = self.tables.write();
        Ok(tables.song_mut(song_id).map(|song| {
            song.play_count += 1;
            song.updated_at = now();
            song.clone()
        }))
    }

    fn pending_songs(&self) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.songs, |s| s.is_approved == Some(false)))
    }

    fn songs_uploaded_by(&self, user_id: &str) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.songs, |s| s.uploaded_by.as_deref() == Some(user_id)))
    }

    fn album_songs(&self, album_id: &str, visibility: Visibility) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        Ok(tables
            .songs
            .iter()
            .filter(|s| s.album_id.as_deref() == Some(album_id) && visibility.admits(s.is_approved))
            .cloned()
            .collect())
    }

    // --------------------- Albums ---------------------
    fn list_albums(&self, visibility: Visibility) -> StoreResult<Vec<Album>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.albums, |a| visibility.admits(a.is_approved)))
    }

    fn find_album(&self, album_id: &str) -> StoreResult<Option<Album>> {
        let tables = self.tables.read();
        Ok(tables.albums.iter().find(|a| a.id == album_id).cloned())
    }

    fn insert_album(&self, album: NewAlbum) -> StoreResult<Album> {
        let mut tables = self.tables.write();
        if tables.albums.iter().any(|a| a.id == album.id) {
            return Err(StoreError::Duplicate);
        }
        let stored = album.into_album();
        tables.albums.push(stored.clone());
        Ok(stored)
    }

    fn update_album(&self, album_id: &str, changes: AlbumChanges) -> StoreResult<Option<Album>> {
        let mut tables = self.tables.write();
        Ok(tables.album_mut(album_id).map(|album| {
            changes.apply_to(album);
            album.clone()
        }))
    }

    fn delete_album_with_songs(&self, album_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        if !tables.albums.iter().any(|a| a.id == album_id) {
            return Ok(false);
        }
        tables.songs.retain(|s| s.album_id.as_deref() != Some(album_id));
        tables.albums.retain(|a| a.id != album_id);
        Ok(true)
    }

    fn set_album_approval(&self, album_id: &str, approved: bool) -> StoreResult<Option<Album>> {
        let mut tables = self.tables.write();
        let timestamp = now();
        let Some(album) = tables.album_mut(album_id).map(|album| {
            album.is_approved = Some(approved);
            album.updated_at = timestamp;
            album.clone()
        }) else {
            return Ok(None);
        };

        if approved {
            for song in tables
                .songs
                .iter_mut()
                .filter(|s| s.album_id.as_deref() == Some(album_id))
            {
                song.is_approved = Some(true);
                song.updated_at = timestamp;
            }
        }
        Ok(Some(album))
    }

    fn pending_albums(&self) -> StoreResult<Vec<Album>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.albums, |a| a.is_approved == Some(false)))
    }

    fn albums_uploaded_by(&self, user_id: &str) -> StoreResult<Vec<Album>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.albums, |a| a.uploaded_by.as_deref() == Some(user_id)))
    }

    // --------------------- Playlists ---------------------
    fn insert_playlist(&self, playlist: NewPlaylist) -> StoreResult<Playlist> {
        let mut tables = self.tables.write();
        let stored = playlist.into_playlist();
        tables.playlists.push(stored.clone());
        Ok(stored)
    }

    fn playlists_owned_by(&self, owner_id: &str) -> StoreResult<Vec<Playlist>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.playlists, |p| p.user_id == owner_id))
    }

    fn find_playlist(&self, playlist_id: &str, owner_id: &str) -> StoreResult<Option<Playlist>> {
        let tables = self.tables.read();
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.id == playlist_id && p.user_id == owner_id)
            .cloned())
    }

    fn update_playlist(
        &self,
        playlist_id: &str,
        owner_id: &str,
        changes: PlaylistChanges,
    ) -> StoreResult<Option<Playlist>> {
        let mut tables = self.tables.write();
        Ok(tables
            .playlists
            .iter_mut()
            .find(|p| p.id == playlist_id && p.user_id == owner_id)
            .map(|playlist| {
                changes.apply_to(playlist);
                playlist.clone()
            }))
    }

    fn delete_playlist(&self, playlist_id: &str, owner_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.playlists.len();
        tables
            .playlists
            .retain(|p| !(p.id == playlist_id && p.user_id == owner_id));
        if tables.playlists.len() == before {
            return Ok(false);
        }
        tables.playlist_songs.retain(|entry| entry.playlist_id != playlist_id);
        Ok(true)
    }

    fn playlist_songs(&self, playlist_id: &str) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        let mut entries: Vec<&PlaylistSong> = tables
            .playlist_songs
            .iter()
            .filter(|entry| entry.playlist_id == playlist_id)
            .collect();
        entries.sort_by_key(|entry| entry.position);
        Ok(entries
            .into_iter()
            .filter_map(|entry| tables.song(&entry.song_id).cloned())
            .collect())
    }

    fn add_playlist_song(&self, playlist_id: &str, song_id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let mut next_position = 0;
        for entry in tables.playlist_songs.iter().filter(|e| e.playlist_id == playlist_id) {
            if entry.song_id == song_id {
                return Err(StoreError::Duplicate);
            }
            next_position = next_position.max(entry.position + 1);
        }
        tables.playlist_songs.push(PlaylistSong {
            playlist_id: playlist_id.to_owned(),
            song_id: song_id.to_owned(),
            position: next_position,
            added_at: now(),
        });
        if let Some(playlist) = tables.playlists.iter_mut().find(|p| p.id == playlist_id) {
            playlist.updated_at = now();
        }
        Ok(())
    }

    fn remove_playlist_song(&self, playlist_id: &str, song_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.playlist_songs.len();
        tables
            .playlist_songs
            .retain(|e| !(e.playlist_id == playlist_id && e.song_id == song_id));
        Ok(tables.playlist_songs.len() != before)
    }

    // --------------------- Favorites ---------------------
    fn insert_favorite(&self, favorite: NewFavorite) -> StoreResult<Favorite> {
        let mut tables = self.tables.write();
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.song_id == favorite.song_id)
        {
            return Err(StoreError::Duplicate);
        }
        let stored = Favorite {
            id: favorite.id,
            user_id: favorite.user_id,
            song_id: favorite.song_id,
            created_at: favorite.created_at,
        };
        tables.favorites.push(stored.clone());
        Ok(stored)
    }

    fn delete_favorite(&self, owner_id: &str, song_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == owner_id && f.song_id == song_id));
        Ok(tables.favorites.len() != before)
    }

    fn favorite_songs(&self, owner_id: &str) -> StoreResult<Vec<Song>> {
        let tables = self.tables.read();
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == owner_id)
            .filter_map(|f| tables.song(&f.song_id).cloned())
            .collect())
    }

    fn is_favorite(&self, owner_id: &str, song_id: &str) -> StoreResult<bool> {
        let tables = self.tables.read();
        Ok(tables
            .favorites
            .iter()
            .any(|f| f.user_id == owner_id && f.song_id == song_id))
    }

    // --------------------- Messages ---------------------
    fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        let mut tables = self.tables.write();
        let stored = message.into_message();
        tables.messages.push(stored.clone());
        Ok(stored)
    }

    fn conversation(&self, user_a: &str, user_b: &str) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read();
        Ok(tables
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == user_a && m.receiver_id == user_b)
                    || (m.sender_id == user_b && m.receiver_id == user_a)
            })
            .cloned()
            .collect())
    }

    // --------------------- Stats ---------------------
    fn catalog_stats(&self) -> StoreResult<CatalogStats> {
        let tables = self.tables.read();
        let artists: HashSet<&str> = tables.songs.iter().map(|s| s.artist.as_str()).collect();
        Ok(CatalogStats {
            total_songs: tables.songs.len() as i64,
            total_albums: tables.albums.len() as i64,
            total_users: tables.users.len() as i64,
            total_artists: artists.len() as i64,
        })
    }
}
