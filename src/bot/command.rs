//! Command and callback parsing.
//!
//! Commands start with `/`, optionally followed by `@botname`. Arguments are
//! split on whitespace only as far as each command needs, so playlist names
//! and search queries keep their inner spaces. Commands that take a playlist
//! name followed by more text accept the name in double quotes when it has
//! spaces: `/add_to_playlist "Road Trip" t1`.

use crate::catalog::SearchKind;
use crate::error::{Error, Result};
use crate::model::PlaylistId;

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Auth,
    Search { kind: SearchKind, query: String },
    Play { query: String },
    Like { track_id: String },
    Likes,
    CreatePlaylist { name: String },
    RenamePlaylist { old: String, new: String },
    DeletePlaylist { name: String },
    AddToPlaylist { playlist: String, track_id: String },
    RemoveFromPlaylist { playlist: String, track_id: String },
    Playlists,
    ShowPlaylist { name: String },
    /// A `/name` we don't handle
    Unknown(String),
}

const SEARCH_USAGE: &str = "Please give a search type (track, artist, album) and a query. \
     Example: /search track Imagine Dragons";
const PLAY_USAGE: &str = "Please give a track or episode name. Example: /play Imagine Dragons";
const LIKE_USAGE: &str = "Please give a track ID. Example: /like 3n3Ppam7vgaVa1iaRUc9Lp";
const CREATE_USAGE: &str = "Please give a playlist name. Example: /create_playlist My Playlist";
const RENAME_USAGE: &str = "Please give the old and the new name. Quote an old name \
     with spaces. Example: /rename_playlist \"Old Name\" New Name";
const DELETE_USAGE: &str =
    "Please give the name of the playlist to delete. Example: /delete_playlist My Playlist";
const ADD_USAGE: &str = "Please give a playlist and a track ID. Quote a playlist name \
     with spaces. Example: /add_to_playlist \"My Playlist\" track_id";
const REMOVE_USAGE: &str = "Please give a playlist and a track ID. Quote a playlist name \
     with spaces. Example: /remove_from_playlist \"My Playlist\" track_id";
const SHOW_USAGE: &str = "Please give a playlist name. Example: /playlist My Playlist";

impl Command {
    /// Parse message text.
    ///
    /// Returns `Ok(None)` for text that isn't a command and a validation
    /// error carrying a usage hint when arguments are missing or malformed.
    pub fn parse(text: &str) -> Result<Option<Self>> {
        let Some(body) = text.trim().strip_prefix('/') else {
            return Ok(None);
        };

        let (head, args) = split_first(body);
        let name = head.split('@').next().unwrap_or_default().to_ascii_lowercase();

        let command = match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "auth" => Self::Auth,
            "likes" => Self::Likes,
            "playlists" | "get_all_playlists" => Self::Playlists,
            "search" => {
                let (kind, query) = split_first(args);
                if kind.is_empty() || query.is_empty() {
                    return Err(Error::validation(SEARCH_USAGE));
                }
                let kind = match kind.parse::<SearchKind>() {
                    Ok(kind @ (SearchKind::Track | SearchKind::Artist | SearchKind::Album)) => kind,
                    _ => {
                        return Err(Error::validation(format!(
                            "Unknown search type '{kind}'. Use one of: track, artist, album. \
                             Example: /search track Imagine Dragons"
                        )));
                    }
                };
                Self::Search {
                    kind,
                    query: query.to_string(),
                }
            }
            "play" => Self::Play {
                query: required(args, PLAY_USAGE)?,
            },
            "like" => Self::Like {
                track_id: required(args, LIKE_USAGE)?,
            },
            "create_playlist" => Self::CreatePlaylist {
                name: required(args, CREATE_USAGE)?,
            },
            "delete_playlist" => Self::DeletePlaylist {
                name: required(args, DELETE_USAGE)?,
            },
            "playlist" | "get_playlist" => Self::ShowPlaylist {
                name: required(args, SHOW_USAGE)?,
            },
            "rename_playlist" => {
                let (old, new) = pair(args, RENAME_USAGE)?;
                Self::RenamePlaylist { old, new }
            }
            "add_to_playlist" => {
                let (playlist, track_id) = pair(args, ADD_USAGE)?;
                Self::AddToPlaylist { playlist, track_id }
            }
            "remove_from_playlist" => {
                let (playlist, track_id) = pair(args, REMOVE_USAGE)?;
                Self::RemoveFromPlaylist { playlist, track_id }
            }
            _ => Self::Unknown(name),
        };

        Ok(Some(command))
    }

    /// Whether the sender must be registered before this command runs.
    pub fn requires_registration(&self) -> bool {
        !matches!(
            self,
            Self::Start | Self::Help | Self::Auth | Self::Unknown(_)
        )
    }
}

/// A parsed inline-button payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// `like:<track_id>`
    Like { track_id: String },
    /// `playlist:<id>`
    ShowPlaylist { id: PlaylistId },
}

impl Callback {
    pub fn parse(data: &str) -> Result<Self> {
        let invalid = || Error::validation("Unsupported action.");

        let (action, value) = data.split_once(':').ok_or_else(invalid)?;
        let value = value.trim();
        match action {
            "like" if !value.is_empty() => Ok(Self::Like {
                track_id: value.to_string(),
            }),
            "playlist" => value
                .parse()
                .map(|id| Self::ShowPlaylist { id })
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Encode as button data.
    pub fn data(&self) -> String {
        match self {
            Self::Like { track_id } => format!("like:{track_id}"),
            Self::ShowPlaylist { id } => format!("playlist:{id}"),
        }
    }
}

/// Split off the first whitespace-delimited word. Both halves are trimmed.
fn split_first(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (s, ""),
    }
}

fn required(args: &str, usage: &str) -> Result<String> {
    if args.is_empty() {
        return Err(Error::validation(usage));
    }
    Ok(args.to_string())
}

/// Split a leading name and the rest. The name is the first word, or the
/// text between a leading pair of double quotes.
fn pair(args: &str, usage: &str) -> Result<(String, String)> {
    let (first, rest) = match args.strip_prefix('"') {
        Some(quoted) => {
            let (name, rest) = quoted
                .split_once('"')
                .ok_or_else(|| Error::validation(usage))?;
            (name.trim(), rest.trim())
        }
        None => split_first(args),
    };
    if first.is_empty() || rest.is_empty() {
        return Err(Error::validation(usage));
    }
    Ok((first.to_string(), rest.to_string()))
}
