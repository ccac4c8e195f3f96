//! Extension de zenconfig pour la bibliothèque musicale

use crate::builder::AlbumPlaylistBuilder;
use crate::order::FfprobeResolver;
use crate::selection::{NowPlayingStore, Selection};
use std::sync::Arc;

/// Trait d'extension pour zenconfig::Config
pub trait LibraryConfigExt {
    /// Sélection utilisée quand aucun état n'a été persisté
    fn default_selection(&self) -> Selection;

    /// Magasin de la sélection en cours, sur `state.file`
    fn now_playing_store(&self) -> NowPlayingStore;

    /// Constructeur de playlists utilisant l'`ffprobe` configuré
    fn playlist_builder(&self) -> AlbumPlaylistBuilder;
}

impl LibraryConfigExt for zenconfig::Config {
    fn default_selection(&self) -> Selection {
        Selection::new(self.get_default_artist(), self.get_default_album())
    }

    fn now_playing_store(&self) -> NowPlayingStore {
        NowPlayingStore::new(self.get_state_file(), self.default_selection())
    }

    fn playlist_builder(&self) -> AlbumPlaylistBuilder {
        AlbumPlaylistBuilder::new(Arc::new(FfprobeResolver::new(self.get_ffprobe_path())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_uses_configured_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = zenconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();
        config.set_default_artist("Muddy Waters").unwrap();

        let store = config.now_playing_store();
        assert_eq!(store.path(), dir.path().join("now_playing.txt"));
        assert_eq!(
            store.load().await,
            Selection::new("Muddy Waters", "MTV Unplugged")
        );
    }
}
