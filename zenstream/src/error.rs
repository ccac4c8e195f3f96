//! Error types for the streaming side of the stream machine

use std::path::PathBuf;

/// Result type alias for streaming operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while starting or feeding a stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The encoder process could not be started
    #[error("Failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The encoder started without a readable stdout
    #[error("Encoder {} started without stdout", .0.display())]
    NoStdout(PathBuf),

    /// Queue or library error
    #[error(transparent)]
    Playlist(#[from] zenplaylist::Error),

    /// Podcast download failed
    #[error("Download failed: {0}")]
    Download(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a download error
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }
}
