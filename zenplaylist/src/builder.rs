//! Construction de la playlist ordonnée d'un répertoire d'album

use crate::order::TrackOrderResolver;
use crate::track::{AudioExtension, Playlist, Track};
use crate::{Error, Result};
use futures::future::join_all;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Liste un album et ordonne ses morceaux par numéro de piste
#[derive(Clone)]
pub struct AlbumPlaylistBuilder {
    resolver: Arc<dyn TrackOrderResolver>,
}

impl AlbumPlaylistBuilder {
    pub fn new(resolver: Arc<dyn TrackOrderResolver>) -> Self {
        Self { resolver }
    }

    /// Construit la playlist de `album_dir`.
    ///
    /// Le listing est d'abord trié par nom de fichier, puis trié de façon
    /// stable par clé d'ordre : à numéro égal, l'ordre alphabétique tient.
    ///
    /// # Errors
    ///
    /// [`Error::AlbumNotFound`] si le répertoire est absent, n'est pas un
    /// répertoire ou ne peut pas être lu. Un répertoire sans fichier audio
    /// donne une playlist vide.
    pub async fn build(&self, album_dir: &Path) -> Result<Playlist> {
        let entries = list_audio_files(album_dir).await?;

        let keys = join_all(entries.iter().map(|(name, _)| {
            let path = album_dir.join(name);
            let resolver = &self.resolver;
            async move { resolver.order_key(&path).await }
        }))
        .await;

        let tracks = entries
            .into_iter()
            .zip(keys)
            .map(|((name, extension), key)| Track::new(name, extension, key))
            .collect();

        let playlist = Playlist::from_unsorted(tracks);
        info!(
            album = %album_dir.display(),
            tracks = playlist.len(),
            "Album playlist built"
        );
        Ok(playlist)
    }
}

/// Fichiers audio reconnus de `dir`, triés par nom
async fn list_audio_files(dir: &Path) -> Result<Vec<(String, AudioExtension)>> {
    let not_found = |e: std::io::Error| {
        debug!(album = %dir.display(), "Album directory unreadable: {}", e);
        Error::AlbumNotFound(dir.to_path_buf())
    };

    let metadata = tokio::fs::metadata(dir).await.map_err(not_found)?;
    if !metadata.is_dir() {
        return Err(Error::AlbumNotFound(dir.to_path_buf()));
    }

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(not_found)?;
    let mut files = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(not_found)? {
        let Ok(name) = entry.file_name().into_string() else {
            warn!(album = %dir.display(), "Skipping non UTF-8 file name");
            continue;
        };
        let Some(extension) = AudioExtension::from_file_name(&name) else {
            continue;
        };

        // Suivre les liens symboliques : seuls les fichiers réguliers comptent
        match tokio::fs::metadata(entry.path()).await {
            Ok(m) if m.is_file() => files.push((name, extension)),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(file = %name, "Dangling entry skipped");
            }
            Err(e) => {
                warn!(file = %name, "Unreadable entry skipped: {}", e);
            }
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}
