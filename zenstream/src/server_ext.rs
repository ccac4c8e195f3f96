//! Extension zenserver pour les deux services HTTP
//!
//! `zenserver` reste un serveur générique ; cette crate y greffe ses
//! routes sans que `zenserver` en dépende.
//!
//! # Exemple
//!
//! ```ignore
//! use zenserver::ServerBuilder;
//! use zenstream::{BrowseServerExt, StreamServerExt};
//!
//! let mut stream_server = ServerBuilder::stream_configured().build();
//! stream_server.init_stream_service(jukebox.clone(), podcast).await;
//!
//! let mut browse_server = ServerBuilder::browse_configured().build();
//! browse_server.init_browse_service(jukebox, downloader).await;
//! ```

use crate::download::PodcastDownloader;
use crate::jukebox::Jukebox;
use crate::podcast::PodcastSeekStreamer;
use crate::routes::{BrowseState, StreamState, browse_router, stream_router};
use async_trait::async_trait;
use tracing::info;

/// Routes du service de flux (`/stream`, `/podcast`)
#[async_trait]
pub trait StreamServerExt {
    async fn init_stream_service(&mut self, jukebox: Jukebox, podcast: PodcastSeekStreamer);
}

/// Routes du service de sélection (`/`, `/browse`, `/albums`, `/play`, `/download`)
#[async_trait]
pub trait BrowseServerExt {
    async fn init_browse_service(&mut self, jukebox: Jukebox, downloader: PodcastDownloader);
}

#[async_trait]
impl StreamServerExt for zenserver::Server {
    async fn init_stream_service(&mut self, jukebox: Jukebox, podcast: PodcastSeekStreamer) {
        self.add_router("/", stream_router(StreamState { jukebox, podcast }))
            .await;
        info!(server = %self.info().name, "Stream routes registered");
    }
}

#[async_trait]
impl BrowseServerExt for zenserver::Server {
    async fn init_browse_service(&mut self, jukebox: Jukebox, downloader: PodcastDownloader) {
        self.add_router("/", browse_router(BrowseState { jukebox, downloader }))
            .await;
        info!(server = %self.info().name, "Browse routes registered");
    }
}
