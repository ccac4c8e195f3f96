//! # Jukebox
//!
//! État de lecture partagé entre les deux services HTTP : la file de
//! lecture, la sélection en cours et l'encodeur principal, sous un seul
//! verrou.
//!
//! ## Règles de verrouillage
//!
//! - la construction d'une playlist (appels `ffprobe`) se fait hors verrou,
//!   seul le remplacement de la file est fait sous verrou
//! - `next_stream` avance la file et démarre l'encodeur sous le même verrou,
//!   deux requêtes concurrentes ne peuvent donc pas laisser deux encodeurs
//! - la production des blocs audio se fait hors verrou

use crate::Result;
use crate::process_manager::PlaybackProcessManager;
use crate::stream::TranscodeStream;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info};
use zenplaylist::{AlbumPlaylistBuilder, Playlist, QueueState, Selection, Track, library};

struct JukeboxState {
    queue: QueueState,
    selection: Option<Selection>,
    processes: PlaybackProcessManager,
}

#[derive(Clone)]
pub struct Jukebox {
    inner: Arc<Mutex<JukeboxState>>,
    music_dir: PathBuf,
    builder: Arc<AlbumPlaylistBuilder>,
}

impl Jukebox {
    pub fn new(
        music_dir: impl Into<PathBuf>,
        builder: AlbumPlaylistBuilder,
        processes: PlaybackProcessManager,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(JukeboxState {
                queue: QueueState::new(),
                selection: None,
                processes,
            })),
            music_dir: music_dir.into(),
            builder: Arc::new(builder),
        }
    }

    pub fn music_dir(&self) -> &Path {
        &self.music_dir
    }

    /// Charge l'album `selection` et rembobine la file
    ///
    /// # Errors
    ///
    /// [`zenplaylist::Error::AlbumNotFound`] si l'album n'existe pas ; la
    /// file et la sélection restent alors inchangées.
    pub async fn select_album(&self, selection: Selection) -> Result<Playlist> {
        let album_dir = library::album_dir(&self.music_dir, &selection)?;
        let playlist = self.builder.build(&album_dir).await?;

        let mut state = self.inner.lock().await;
        state.queue.replace(playlist.clone());
        info!(
            artist = %selection.artist,
            album = %selection.album,
            tracks = playlist.len(),
            "Album selected"
        );
        state.selection = Some(selection);
        Ok(playlist)
    }

    /// Morceau suivant et son flux Ogg
    ///
    /// # Errors
    ///
    /// - [`zenplaylist::Error::EmptyPlaylist`] si rien n'est à jouer
    /// - [`crate::Error::Spawn`] si l'encodeur ne démarre pas ; la file a
    ///   tout de même avancé
    pub async fn next_stream(&self) -> Result<(Track, TranscodeStream)> {
        let mut state = self.inner.lock().await;
        let track = state.queue.next_track()?.clone();

        let Some(selection) = state.selection.clone() else {
            return Err(zenplaylist::Error::EmptyPlaylist.into());
        };
        let path = library::album_dir(&self.music_dir, &selection)?.join(track.file_name());
        info!(track = %track.file_name(), position = state.queue.position(), "Now streaming");

        let weak = Arc::downgrade(&self.inner);
        let stream = state
            .processes
            .start_primary(&path, move |generation| release_later(weak, generation))
            .await?;

        Ok((track, stream))
    }

    pub async fn now_playing(&self) -> Option<Selection> {
        self.inner.lock().await.selection.clone()
    }

    pub async fn primary_pid(&self) -> Option<u32> {
        self.inner.lock().await.processes.active_pid()
    }

    /// Arrête l'encodeur principal
    pub async fn shutdown(&self) {
        self.inner.lock().await.processes.stop().await;
        debug!("Jukebox stopped");
    }
}

/// Libère l'encodeur d'une génération depuis le crochet de fin de flux,
/// qui n'est pas async et peut s'exécuter pendant un drop
fn release_later(weak: Weak<Mutex<JukeboxState>>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        runtime.spawn(async move {
            inner.lock().await.processes.release_primary(generation).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use zenplaylist::{SENTINEL_ORDER_KEY, TrackOrderResolver};

    struct NameKeys;

    #[async_trait]
    impl TrackOrderResolver for NameKeys {
        async fn order_key(&self, path: &Path) -> u32 {
            path.file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
                .unwrap_or(SENTINEL_ORDER_KEY)
        }
    }

    fn jukebox(dir: &tempfile::TempDir) -> Jukebox {
        let album = dir.path().join("Artist").join("Album");
        std::fs::create_dir_all(&album).unwrap();
        for name in ["2.mp3", "1.ogg", "cover.jpg"] {
            std::fs::write(album.join(name), b"").unwrap();
        }
        Jukebox::new(
            dir.path(),
            AlbumPlaylistBuilder::new(Arc::new(NameKeys)),
            PlaybackProcessManager::new("/nonexistent/zenith/ffmpeg", 1024),
        )
    }

    #[tokio::test]
    async fn test_select_album_records_selection() {
        let dir = tempfile::tempdir().unwrap();
        let jukebox = jukebox(&dir);
        assert_eq!(jukebox.now_playing().await, None);

        let playlist = jukebox
            .select_album(Selection::new("Artist", "Album"))
            .await
            .unwrap();
        assert_eq!(playlist.file_names(), vec!["1.ogg", "2.mp3"]);
        assert_eq!(
            jukebox.now_playing().await,
            Some(Selection::new("Artist", "Album"))
        );
    }

    #[tokio::test]
    async fn test_unknown_album_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let jukebox = jukebox(&dir);
        jukebox
            .select_album(Selection::new("Artist", "Album"))
            .await
            .unwrap();

        let err = jukebox
            .select_album(Selection::new("Artist", "Missing"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Playlist(zenplaylist::Error::AlbumNotFound(_))
        ));
        assert_eq!(
            jukebox.now_playing().await,
            Some(Selection::new("Artist", "Album"))
        );
    }

    #[tokio::test]
    async fn test_next_stream_without_album_is_empty_playlist() {
        let dir = tempfile::tempdir().unwrap();
        let jukebox = jukebox(&dir);
        let err = jukebox.next_stream().await.err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Playlist(zenplaylist::Error::EmptyPlaylist)
        ));
    }

    #[tokio::test]
    async fn test_spawn_failure_still_advances_queue() {
        let dir = tempfile::tempdir().unwrap();
        let jukebox = jukebox(&dir);
        jukebox
            .select_album(Selection::new("Artist", "Album"))
            .await
            .unwrap();

        let err = jukebox.next_stream().await.err().unwrap();
        assert!(matches!(err, crate::Error::Spawn { .. }));
        assert_eq!(jukebox.primary_pid().await, None);
    }
}
