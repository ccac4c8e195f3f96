//! Routes HTTP des deux services
//!
//! - service de flux : `/stream`, `/podcast`
//! - service de sélection : `/`, `/browse`, `/albums/{artist}`,
//!   `/play/{artist}/{album}`, `/download`

use crate::download::PodcastDownloader;
use crate::jukebox::Jukebox;
use crate::podcast::PodcastSeekStreamer;
use crate::stream::TranscodeStream;
use crate::transcoder::{PODCAST_CONTENT_TYPE, PRIMARY_CONTENT_TYPE};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};
use zenplaylist::{Selection, library};

/// État partagé du service de flux
#[derive(Clone)]
pub struct StreamState {
    pub jukebox: Jukebox,
    pub podcast: PodcastSeekStreamer,
}

/// État partagé du service de sélection
#[derive(Clone)]
pub struct BrowseState {
    pub jukebox: Jukebox,
    pub downloader: PodcastDownloader,
}

pub fn stream_router(state: StreamState) -> Router {
    Router::new()
        .route("/stream", get(stream_primary))
        .route("/podcast", get(stream_podcast))
        .with_state(state)
}

pub fn browse_router(state: BrowseState) -> Router {
    Router::new()
        .route("/", get(browse))
        .route("/browse", get(browse))
        .route("/albums/{artist}", get(albums))
        .route("/play/{artist}/{album}", get(play))
        .route("/download", get(download))
        .with_state(state)
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn audio_response(content_type: &'static str, stream: TranscodeStream) -> Response {
    (
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(stream),
    )
        .into_response()
}

// ============================================================================
// Service de flux
// ============================================================================

async fn stream_primary(State(state): State<StreamState>) -> Response {
    match state.jukebox.next_stream().await {
        Ok((_, stream)) => audio_response(PRIMARY_CONTENT_TYPE, stream),
        Err(crate::Error::Playlist(zenplaylist::Error::EmptyPlaylist)) => {
            warn!("Stream requested with nothing queued");
            json_error(StatusCode::NOT_FOUND, "Playlist is empty")
        }
        Err(e) => {
            error!("Failed to start primary stream: {}", e);
            audio_response(PRIMARY_CONTENT_TYPE, TranscodeStream::empty())
        }
    }
}

#[derive(Debug, Deserialize)]
struct PodcastQuery {
    start: Option<String>,
}

/// Position de départ en secondes ; absente ou invalide, elle vaut 0
fn parse_start(start: Option<&str>) -> u64 {
    start.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

async fn stream_podcast(
    State(state): State<StreamState>,
    Query(query): Query<PodcastQuery>,
) -> Response {
    let offset = parse_start(query.start.as_deref());
    match state.podcast.stream(offset) {
        Ok(stream) => audio_response(PODCAST_CONTENT_TYPE, stream),
        Err(e) => {
            error!(offset, "Failed to start podcast stream: {}", e);
            audio_response(PODCAST_CONTENT_TYPE, TranscodeStream::empty())
        }
    }
}

// ============================================================================
// Service de sélection
// ============================================================================

#[derive(Debug, Serialize)]
struct BrowseResponse {
    artists: Vec<String>,
    now_playing: Option<Selection>,
}

async fn browse(State(state): State<BrowseState>) -> Response {
    match library::list_artists(state.jukebox.music_dir()).await {
        Ok(artists) => Json(BrowseResponse {
            artists,
            now_playing: state.jukebox.now_playing().await,
        })
        .into_response(),
        Err(e) => {
            error!("Cannot list music directory: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Music library unavailable")
        }
    }
}

async fn albums(State(state): State<BrowseState>, Path(artist): Path<String>) -> Response {
    match library::list_albums(state.jukebox.music_dir(), &artist).await {
        Ok(albums) => Json(albums).into_response(),
        Err(e) if e.is_not_found() => json_error(StatusCode::NOT_FOUND, "Artist not found"),
        Err(e) => {
            error!(artist = %artist, "Cannot list albums: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Music library unavailable")
        }
    }
}

async fn play(
    State(state): State<BrowseState>,
    Path((artist, album)): Path<(String, String)>,
) -> Response {
    match state.jukebox.select_album(Selection::new(artist, album)).await {
        Ok(playlist) => Json(playlist.file_names()).into_response(),
        Err(crate::Error::Playlist(e)) if e.is_not_found() => {
            json_error(StatusCode::NOT_FOUND, "Album not found")
        }
        Err(e) => {
            error!("Album selection failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Album selection failed")
        }
    }
}

async fn download(State(state): State<BrowseState>) -> Response {
    match state.downloader.download().await {
        Ok(_) => (StatusCode::OK, "Podcast downloaded.").into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to download podcast: {}", e),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        assert_eq!(parse_start(None), 0);
        assert_eq!(parse_start(Some("90")), 90);
        assert_eq!(parse_start(Some(" 15 ")), 15);
        assert_eq!(parse_start(Some("abc")), 0);
        assert_eq!(parse_start(Some("-5")), 0);
        assert_eq!(parse_start(Some("")), 0);
    }
}
