//! Converts catalog DTOs into domain types.
//!
//! Missing names fall back to "Unknown ..." placeholders so a sparse API
//! object never fails a whole search.

use super::domain::{AlbumInfo, ArtistInfo, EpisodeInfo, SearchResults, TrackInfo};
use super::dto;

const UNKNOWN_TRACK: &str = "Unknown Track";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";
const UNKNOWN_EPISODE: &str = "Unknown Episode";
const UNKNOWN_DATE: &str = "Unknown Date";

pub fn to_search_results(response: dto::SearchResponse) -> SearchResults {
    SearchResults {
        tracks: items(response.tracks).map(to_track).collect(),
        artists: items(response.artists).map(to_artist).collect(),
        albums: items(response.albums).map(to_album).collect(),
        episodes: items(response.episodes).map(to_episode).collect(),
    }
}

pub fn to_track(track: dto::Track) -> TrackInfo {
    TrackInfo {
        id: track.id.unwrap_or_default(),
        name: track.name.unwrap_or_else(|| UNKNOWN_TRACK.to_string()),
        artists: join_artists(&track.artists),
        album: track
            .album
            .and_then(|a| a.name)
            .unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        preview_url: track.preview_url.filter(|u| !u.is_empty()),
    }
}

fn to_artist(artist: dto::Artist) -> ArtistInfo {
    ArtistInfo {
        id: artist.id.unwrap_or_default(),
        name: artist.name.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        genres: artist.genres,
    }
}

fn to_album(album: dto::Album) -> AlbumInfo {
    AlbumInfo {
        id: album.id.unwrap_or_default(),
        name: album.name.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
        artists: join_artists(&album.artists),
        release_date: album
            .release_date
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
    }
}

fn to_episode(episode: dto::Episode) -> EpisodeInfo {
    EpisodeInfo {
        id: episode.id.unwrap_or_default(),
        name: episode.name.unwrap_or_else(|| UNKNOWN_EPISODE.to_string()),
        preview_url: episode.audio_preview_url.filter(|u| !u.is_empty()),
    }
}

fn items<T>(page: Option<dto::Paging<T>>) -> impl Iterator<Item = T> {
    page.into_iter().flat_map(|p| p.items).flatten()
}

fn join_artists(artists: &[dto::SimpleArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
