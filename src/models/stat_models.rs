use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_songs: i64,
    pub total_albums: i64,
    pub total_users: i64,
    /// Distinct artist names across all songs.
    pub total_artists: i64,
}
