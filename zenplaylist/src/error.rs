//! Types d'erreurs pour zenplaylist

use std::path::PathBuf;

/// Erreurs de construction et de parcours des playlists
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Artist not found: {0}")]
    ArtistNotFound(String),

    #[error("Album not found: {}", .0.display())]
    AlbumNotFound(PathBuf),

    #[error("Playlist is empty")]
    EmptyPlaylist,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Vrai pour les erreurs « répertoire absent » remontées en 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ArtistNotFound(_) | Error::AlbumNotFound(_))
    }
}

/// Type Result spécialisé pour zenplaylist
pub type Result<T> = std::result::Result<T, Error>;
