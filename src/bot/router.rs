//! Maps updates to library operations and catalog calls.
//!
//! Every update is handled independently. Failures never escape
//! [`Router::handle`]: validation errors become usage replies, storage and
//! catalog failures are logged and turned into a short apology.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::command::{Callback, Command};
use super::reply::{AudioReply, HELP_TEXT, Reply, escape_html, welcome_text};
use super::{Sender, Update};
use crate::catalog::{
    CatalogApi, CatalogError, Preview, SearchKind, SearchResults, extract_preview_url,
};
use crate::db::Store;
use crate::error::{Error, Result, ResultExt};
use crate::library::{self, MembershipOutcome, Registration, RenameOutcome};
use crate::model::{Playlist, UserId};

const NOT_REGISTERED: &str = "❌ You are not registered. Please use /start to register.";
const NOTHING_FOUND: &str = "Nothing found. Try a different query.";
const PLAYLIST_NOT_FOUND: &str = "❌ No playlist with that name was found.";
const STORAGE_FAILURE: &str = "⚠️ Something went wrong with your library. Please try again.";
const CATALOG_FAILURE: &str =
    "⚠️ The music catalog is not reachable right now. Please try again later.";

/// Handles updates for all users.
pub struct Router {
    store: Store,
    catalog: Arc<dyn CatalogApi>,
    search_limit: u32,
}

impl Router {
    pub fn new(store: Store, catalog: Arc<dyn CatalogApi>, search_limit: u32) -> Self {
        Self {
            store,
            catalog,
            search_limit: search_limit.max(1),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Handle one update and return the replies for the sender's chat.
    pub async fn handle(&self, update: &Update) -> Vec<Reply> {
        let sender = update.sender();
        match self.dispatch(update).await {
            Ok(replies) => replies,
            Err(e) => vec![failure_reply(sender.id, &e)],
        }
    }

    async fn dispatch(&self, update: &Update) -> Result<Vec<Reply>> {
        match update {
            Update::Message { sender, text } => {
                let Some(command) = Command::parse(text)? else {
                    debug!(target: "tunebot::bot", user = sender.id, "Ignoring non-command text");
                    return Ok(Vec::new());
                };
                info!(target: "tunebot::bot", user = sender.id, command = ?command, "Handling command");

                if command.requires_registration() && !self.is_registered(sender.id).await? {
                    return Ok(vec![Reply::plain(NOT_REGISTERED)]);
                }
                self.run_command(sender, command).await
            }
            Update::Callback { sender, data } => {
                let callback = Callback::parse(data)?;
                info!(target: "tunebot::bot", user = sender.id, callback = ?callback, "Handling button press");

                if !self.is_registered(sender.id).await? {
                    return Ok(vec![Reply::plain(NOT_REGISTERED)]);
                }
                match callback {
                    Callback::Like { track_id } => self.like(sender.id, &track_id).await,
                    Callback::ShowPlaylist { id } => {
                        let playlist = library::find_playlist_by_id(&self.store, sender.id, id)
                            .await
                            .with_context("while looking up playlist")?;
                        match playlist {
                            Some(playlist) => self.show_playlist(sender.id, &playlist).await,
                            None => Ok(vec![Reply::plain(PLAYLIST_NOT_FOUND)]),
                        }
                    }
                }
            }
        }
    }

    async fn run_command(&self, sender: &Sender, command: Command) -> Result<Vec<Reply>> {
        let user = sender.id;
        match command {
            Command::Start => self.start(sender).await,
            Command::Help => Ok(vec![Reply::html(HELP_TEXT)]),
            Command::Auth => {
                let text = if self.is_registered(user).await? {
                    "✅ You are registered!"
                } else {
                    NOT_REGISTERED
                };
                Ok(vec![Reply::plain(text)])
            }
            Command::Search { kind, query } => self.search(kind, &query).await,
            Command::Play { query } => self.play(&query).await,
            Command::Like { track_id } => self.like(user, &track_id).await,
            Command::Likes => self.likes(user).await,
            Command::CreatePlaylist { name } => {
                let created = library::create_playlist(&self.store, user, &name).await?;
                let text = if created {
                    format!("✅ Playlist '{name}' created!")
                } else {
                    format!("You already have a playlist named '{name}'.")
                };
                Ok(vec![Reply::plain(text)])
            }
            Command::RenamePlaylist { old, new } => {
                let text = match library::rename_playlist(&self.store, user, &old, &new).await? {
                    RenameOutcome::Renamed => format!("✅ Playlist '{old}' renamed to '{new}'!"),
                    RenameOutcome::NotFound => PLAYLIST_NOT_FOUND.to_string(),
                    RenameOutcome::NameTaken => {
                        format!("❌ You already have a playlist named '{new}'.")
                    }
                };
                Ok(vec![Reply::plain(text)])
            }
            Command::DeletePlaylist { name } => {
                let text = if library::delete_playlist(&self.store, user, &name).await? {
                    format!("✅ Playlist '{name}' deleted!")
                } else {
                    PLAYLIST_NOT_FOUND.to_string()
                };
                Ok(vec![Reply::plain(text)])
            }
            Command::AddToPlaylist { playlist, track_id } => {
                self.change_membership(user, &playlist, &track_id, true).await
            }
            Command::RemoveFromPlaylist { playlist, track_id } => {
                self.change_membership(user, &playlist, &track_id, false).await
            }
            Command::Playlists => self.playlists(user).await,
            Command::ShowPlaylist { name } => {
                match library::find_playlist(&self.store, user, &name).await? {
                    Some(playlist) => self.show_playlist(user, &playlist).await,
                    None => Ok(vec![Reply::plain(PLAYLIST_NOT_FOUND)]),
                }
            }
            Command::Unknown(name) => Ok(vec![Reply::plain(format!(
                "Unknown command /{name}. Send /help to see what I can do."
            ))]),
        }
    }

    async fn is_registered(&self, user: UserId) -> Result<bool> {
        library::is_authenticated(&self.store, user)
            .await
            .with_context("while checking registration")
    }

    async fn start(&self, sender: &Sender) -> Result<Vec<Reply>> {
        let outcome = library::register_user(&self.store, sender.id, sender.username.as_deref())
            .await
            .with_context("while registering user")?;
        match outcome {
            Registration::Created => info!(target: "tunebot::bot", user = sender.id, "New user registered"),
            Registration::Repaired => warn!(target: "tunebot::bot", user = sender.id, "Re-created damaged user row"),
            Registration::Existing => debug!(target: "tunebot::bot", user = sender.id, "User already registered"),
        }
        Ok(vec![Reply::plain(welcome_text(&sender.first_name))])
    }

    async fn search(&self, kind: SearchKind, query: &str) -> Result<Vec<Reply>> {
        let results = self.catalog.search(query, kind, self.search_limit).await?;
        if results.is_empty() {
            return Ok(vec![Reply::plain(NOTHING_FOUND)]);
        }
        Ok(search_replies(&results))
    }

    async fn play(&self, query: &str) -> Result<Vec<Reply>> {
        let mut results = self.catalog.search(query, SearchKind::Track, 1).await?;
        if results.tracks.is_empty() {
            results.episodes = self
                .catalog
                .search(query, SearchKind::Episode, 1)
                .await?
                .episodes;
        }

        let reply = match extract_preview_url(&results) {
            Preview::Available {
                url,
                title,
                performer,
            } => {
                let data = self.catalog.download_preview(&url).await?;
                let caption = match &performer {
                    Some(performer) => format!("🎵 {title}\n👤 {performer}"),
                    None => format!("🎧 {title}\nEpisode preview."),
                };
                Reply::audio(
                    caption,
                    AudioReply {
                        data,
                        title,
                        performer,
                    },
                )
            }
            Preview::Unavailable {
                title,
                performer: Some(performer),
            } => Reply::plain(format!(
                "Sorry, there is no preview for '{title}' ({performer})."
            )),
            Preview::Unavailable { title, .. } => {
                Reply::plain(format!("Sorry, there is no preview for '{title}'."))
            }
            Preview::NothingFound => Reply::plain(NOTHING_FOUND),
        };
        Ok(vec![reply])
    }

    async fn like(&self, user: UserId, track_id: &str) -> Result<Vec<Reply>> {
        let track = match self.catalog.get_track(track_id).await {
            Ok(track) => track,
            Err(CatalogError::Status { status: 400 | 404, .. }) => {
                return Ok(vec![Reply::plain(format!(
                    "❌ Track '{track_id}' was not found in the catalog."
                ))]);
            }
            Err(e) => return Err(e.into()),
        };

        let inserted = library::like_track(
            &self.store,
            user,
            track_id,
            &track.name,
            &track.artists,
            &track.album,
        )
        .await
        .with_context("while saving liked track")?;

        let text = if inserted {
            format!("❤️ '{}' added to your likes!", track.name)
        } else {
            format!("'{}' is already in your likes.", track.name)
        };
        Ok(vec![Reply::plain(text)])
    }

    async fn likes(&self, user: UserId) -> Result<Vec<Reply>> {
        let tracks = library::list_liked_tracks(&self.store, user).await?;
        if tracks.is_empty() {
            return Ok(vec![Reply::plain(
                "You have no liked tracks yet. Use /search and like the tracks you enjoy!",
            )]);
        }

        let mut text = String::from("Your liked tracks:\n\n");
        for (idx, track) in tracks.iter().enumerate() {
            text.push_str(&format!(
                "{}. <b>{}</b>\n   Artists: {}\n   Album: {}\n   ID: <code>{}</code>\n\n",
                idx + 1,
                escape_html(&track.track_name),
                escape_html(&track.artist_name),
                escape_html(&track.album_name),
                escape_html(&track.track_id),
            ));
        }
        Ok(vec![Reply::html(text.trim_end())])
    }

    async fn change_membership(
        &self,
        user: UserId,
        playlist_name: &str,
        track_id: &str,
        add: bool,
    ) -> Result<Vec<Reply>> {
        let Some(playlist) = library::find_playlist(&self.store, user, playlist_name).await? else {
            return Ok(vec![Reply::plain(PLAYLIST_NOT_FOUND)]);
        };

        let outcome = if add {
            library::add_track_to_playlist(&self.store, user, playlist.id, track_id).await?
        } else {
            library::remove_track_from_playlist(&self.store, user, playlist.id, track_id).await?
        };

        let text = match outcome {
            MembershipOutcome::Added => {
                format!("✅ Track '{track_id}' added to playlist '{playlist_name}'!")
            }
            MembershipOutcome::AlreadyPresent => {
                format!("Track '{track_id}' is already in playlist '{playlist_name}'.")
            }
            MembershipOutcome::Removed => {
                format!("✅ Track '{track_id}' removed from playlist '{playlist_name}'!")
            }
            MembershipOutcome::NotInPlaylist => {
                format!("Track '{track_id}' is not in playlist '{playlist_name}'.")
            }
            MembershipOutcome::PlaylistNotFound => PLAYLIST_NOT_FOUND.to_string(),
        };
        Ok(vec![Reply::plain(text)])
    }

    async fn playlists(&self, user: UserId) -> Result<Vec<Reply>> {
        let playlists = library::list_user_playlists(&self.store, user).await?;
        if playlists.is_empty() {
            return Ok(vec![Reply::plain(
                "You have no playlists yet. Create one with /create_playlist <name>.",
            )]);
        }

        Ok(playlists
            .into_iter()
            .map(|p| {
                Reply::html(format!("🎶 <b>{}</b>", escape_html(&p.name))).with_button(
                    "Show tracks",
                    Callback::ShowPlaylist { id: p.id }.data(),
                )
            })
            .collect())
    }

    async fn show_playlist(&self, user: UserId, playlist: &Playlist) -> Result<Vec<Reply>> {
        let entries = library::get_playlist_track_summaries(&self.store, user, playlist.id)
            .await
            .with_context("while listing playlist tracks")?;
        let name = escape_html(&playlist.name);
        if entries.is_empty() {
            return Ok(vec![Reply::html(format!("Playlist <b>{name}</b> is empty."))]);
        }

        let mut text = format!("Playlist <b>{name}</b>:\n\n");
        for (idx, entry) in entries.iter().enumerate() {
            let line = match (&entry.track_name, &entry.artist_name) {
                (Some(track), artist) => format!(
                    "{}. <b>{}</b> ({})",
                    idx + 1,
                    escape_html(track),
                    escape_html(artist.as_deref().unwrap_or_default())
                ),
                (None, _) => format!(
                    "{}. <code>{}</code> (not in your likes)",
                    idx + 1,
                    escape_html(&entry.track_id)
                ),
            };
            text.push_str(&line);
            text.push('\n');
        }
        Ok(vec![Reply::html(text.trim_end())])
    }
}

/// One reply per search hit. Tracks get a like button.
fn search_replies(results: &SearchResults) -> Vec<Reply> {
    let tracks = results.tracks.iter().enumerate().map(|(idx, t)| {
        Reply::html(format!(
            "{}. <b>{}</b>\n   Artists: {}\n   Album: {}",
            idx + 1,
            escape_html(&t.name),
            escape_html(&t.artists),
            escape_html(&t.album)
        ))
        .with_button(
            format!("❤️ Like: {}", t.name),
            Callback::Like {
                track_id: t.id.clone(),
            }
            .data(),
        )
    });

    let artists = results.artists.iter().enumerate().map(|(idx, a)| {
        let genres = if a.genres.is_empty() {
            "not specified".to_string()
        } else {
            a.genres.join(", ")
        };
        Reply::html(format!(
            "{}. <b>{}</b>\n   Genres: {}",
            idx + 1,
            escape_html(&a.name),
            escape_html(&genres)
        ))
    });

    let albums = results.albums.iter().enumerate().map(|(idx, a)| {
        Reply::html(format!(
            "{}. <b>{}</b>\n   Artists: {}\n   Released: {}",
            idx + 1,
            escape_html(&a.name),
            escape_html(&a.artists),
            escape_html(&a.release_date)
        ))
    });

    tracks.chain(artists).chain(albums).collect()
}

/// Turn a failed command into something the user can read.
fn failure_reply(user: UserId, error: &Error) -> Reply {
    match error.root() {
        Error::Validation(message) => Reply::plain(message.clone()),
        Error::Storage(_) => {
            warn!(target: "tunebot::bot", user, error = %error, "Storage failure while handling update");
            Reply::plain(STORAGE_FAILURE)
        }
        Error::RemoteApi(_) => {
            warn!(target: "tunebot::bot", user, error = %error, "Catalog failure while handling update");
            Reply::plain(CATALOG_FAILURE)
        }
        _ => {
            warn!(target: "tunebot::bot", user, error = %error, "Failed to handle update");
            Reply::plain("⚠️ Something went wrong. Please try again.")
        }
    }
}
