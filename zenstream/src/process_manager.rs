//! Processus d'encodage principal
//!
//! Un seul encodeur principal vit à la fois. Chaque lancement reçoit un
//! numéro de génération : la libération déclenchée par la fin d'un flux
//! ne touche que l'encodeur de sa propre génération, jamais son
//! remplaçant.

use crate::Result;
use crate::stream::TranscodeStream;
use crate::transcoder::{TranscodeHandle, primary_args};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Taille de bloc par défaut des flux
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug)]
pub struct PlaybackProcessManager {
    ffmpeg: PathBuf,
    chunk_size: usize,
    current: Option<(u64, TranscodeHandle)>,
    generation: u64,
}

impl PlaybackProcessManager {
    pub fn new(ffmpeg: impl Into<PathBuf>, chunk_size: usize) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            chunk_size,
            current: None,
            generation: 0,
        }
    }

    /// Démarre l'encodage de `path` après avoir tué et attendu
    /// l'encodeur précédent.
    ///
    /// `on_finish` reçoit la génération du nouvel encodeur quand son flux
    /// se termine ; il doit rappeler [`release_primary`](Self::release_primary).
    ///
    /// # Errors
    ///
    /// [`crate::Error::Spawn`] si `ffmpeg` ne démarre pas. L'ancien
    /// encodeur est alors déjà arrêté.
    pub async fn start_primary<F>(&mut self, path: &Path, on_finish: F) -> Result<TranscodeStream>
    where
        F: FnOnce(u64) + Send + 'static,
    {
        self.stop().await;

        let (handle, stdout) =
            TranscodeHandle::spawn(&self.ffmpeg, primary_args(path), path.display().to_string())?;

        self.generation += 1;
        let generation = self.generation;
        self.current = Some((generation, handle));

        Ok(TranscodeStream::new(stdout, self.chunk_size, move || {
            on_finish(generation)
        }))
    }

    /// Libère l'encodeur de la génération donnée s'il est toujours actif
    pub async fn release_primary(&mut self, generation: u64) {
        match &self.current {
            Some((current, _)) if *current == generation => {
                if let Some((_, handle)) = self.current.take() {
                    handle.terminate().await;
                }
            }
            _ => debug!(generation, "Primary encoder already replaced"),
        }
    }

    /// Arrête l'encodeur courant, s'il y en a un
    pub async fn stop(&mut self) {
        if let Some((_, handle)) = self.current.take() {
            handle.terminate().await;
        }
    }

    pub fn active_pid(&self) -> Option<u32> {
        self.current.as_ref().and_then(|(_, handle)| handle.id())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}
