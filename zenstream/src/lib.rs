//! # zenstream - Encodeurs, jukebox et services HTTP
//!
//! Cette crate relie la file de lecture de `zenplaylist` aux processus
//! `ffmpeg` et aux deux services HTTP de la machine de diffusion.
//!
//! ## Architecture
//!
//! ```text
//!  GET /stream ──> Jukebox ──(verrou)──> QueueState::next_track
//!                     │                        │
//!                     │                        v
//!                     └────────────> PlaybackProcessManager::start_primary
//!                                              │
//!                                              v
//!                                     TranscodeStream (blocs Ogg)
//!
//!  GET /podcast ──> PodcastSeekStreamer ──> TranscodeStream (blocs MP3)
//! ```
//!
//! Les routes sont greffées sur un `zenserver::Server` par les traits
//! [`StreamServerExt`] et [`BrowseServerExt`].

mod config_ext;
mod download;
mod error;
mod jukebox;
mod podcast;
mod process_manager;
mod routes;
mod server_ext;
mod stream;
mod transcoder;

pub use config_ext::StreamConfigExt;
pub use download::PodcastDownloader;
pub use error::{Error, Result};
pub use jukebox::Jukebox;
pub use podcast::PodcastSeekStreamer;
pub use process_manager::{DEFAULT_CHUNK_SIZE, PlaybackProcessManager};
pub use routes::{BrowseState, StreamState, browse_router, stream_router};
pub use server_ext::{BrowseServerExt, StreamServerExt};
pub use stream::TranscodeStream;
pub use transcoder::{
    PODCAST_CONTENT_TYPE, PRIMARY_CONTENT_TYPE, TranscodeHandle, podcast_args, primary_args,
};
