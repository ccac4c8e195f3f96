//! Sélection « en cours de lecture » et sa persistance
//!
//! Le fichier d'état tient sur deux lignes de texte : l'artiste puis
//! l'album. Il est lu au démarrage et écrit à l'arrêt.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Couple (artiste, album) désignant `<music_dir>/<artist>/<album>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub artist: String,
    pub album: String,
}

impl Selection {
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }

    fn parse(content: &str) -> Option<Self> {
        let mut lines = content.lines().map(str::trim);
        let artist = lines.next().filter(|l| !l.is_empty())?;
        let album = lines.next().filter(|l| !l.is_empty())?;
        Some(Self::new(artist, album))
    }
}

/// Lecture / écriture de la sélection persistée
#[derive(Debug, Clone)]
pub struct NowPlayingStore {
    path: PathBuf,
    default: Selection,
}

impl NowPlayingStore {
    pub fn new(path: impl Into<PathBuf>, default: Selection) -> Self {
        Self {
            path: path.into(),
            default,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_selection(&self) -> &Selection {
        &self.default
    }

    /// Sélection persistée, ou la sélection par défaut si le fichier est
    /// absent, illisible ou incomplet
    pub async fn load(&self) -> Selection {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match Selection::parse(&content) {
                Some(selection) => {
                    info!(
                        artist = %selection.artist,
                        album = %selection.album,
                        "Now playing restored"
                    );
                    selection
                }
                None => {
                    warn!(file = %self.path.display(), "Malformed now-playing file, using default");
                    self.default.clone()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(file = %self.path.display(), "No now-playing file, using default");
                self.default.clone()
            }
            Err(e) => {
                warn!(file = %self.path.display(), "Cannot read now-playing file: {}", e);
                self.default.clone()
            }
        }
    }

    /// Écrit la sélection ; un échec est journalisé, jamais remonté
    pub async fn save(&self, selection: &Selection) {
        match self.try_save(selection).await {
            Ok(()) => info!(file = %self.path.display(), "Now playing saved"),
            Err(e) => warn!(file = %self.path.display(), "Failed to save now playing: {}", e),
        }
    }

    async fn try_save(&self, selection: &Selection) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = format!("{}\n{}\n", selection.artist, selection.album);
        tokio::fs::write(&self.path, content).await
    }
}
