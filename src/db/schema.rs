//! Table definitions.
//!
//! Every statement is idempotent so the whole list can run on each start.
//! Table and column names are a stable contract for external tooling.

pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    telegram_id BIGINT UNIQUE NOT NULL,
    username TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const CREATE_LIKED_TRACKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS liked_tracks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    track_id TEXT NOT NULL,
    track_name TEXT NOT NULL,
    artist_name TEXT NOT NULL,
    album_name TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(user_id, track_id)
)
"#;

pub const CREATE_PLAYLISTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS playlists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(user_id, name)
)
"#;

pub const CREATE_PLAYLIST_TRACKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS playlist_tracks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    playlist_id INTEGER NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
    track_id TEXT NOT NULL,
    added_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(playlist_id, track_id)
)
"#;

pub const CREATE_PLAYLISTS_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_playlists_user ON playlists(user_id, created_at)";

pub const CREATE_PLAYLIST_TRACKS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_playlist_tracks_playlist ON playlist_tracks(playlist_id)";

/// All schema statements in dependency order.
pub const STATEMENTS: &[&str] = &[
    CREATE_USERS_TABLE,
    CREATE_LIKED_TRACKS_TABLE,
    CREATE_PLAYLISTS_TABLE,
    CREATE_PLAYLIST_TRACKS_TABLE,
    CREATE_PLAYLISTS_USER_INDEX,
    CREATE_PLAYLIST_TRACKS_INDEX,
];
