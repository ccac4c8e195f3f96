//! Lecture du podcast à partir d'une position
//!
//! Chaque requête possède son propre encodeur, indépendant du flux
//! principal et des autres auditeurs du podcast.

use crate::Result;
use crate::stream::TranscodeStream;
use crate::transcoder::{TranscodeHandle, podcast_args};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PodcastSeekStreamer {
    ffmpeg: PathBuf,
    podcast_file: PathBuf,
    chunk_size: usize,
}

impl PodcastSeekStreamer {
    pub fn new(
        ffmpeg: impl Into<PathBuf>,
        podcast_file: impl Into<PathBuf>,
        chunk_size: usize,
    ) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            podcast_file: podcast_file.into(),
            chunk_size,
        }
    }

    /// Flux MP3 du podcast à partir de `offset_seconds`
    ///
    /// L'encodeur est tué dès que le flux se termine ou est lâché.
    pub fn stream(&self, offset_seconds: u64) -> Result<TranscodeStream> {
        let (handle, stdout) = TranscodeHandle::spawn(
            &self.ffmpeg,
            podcast_args(&self.podcast_file, offset_seconds),
            format!("podcast@{}s", offset_seconds),
        )?;

        Ok(TranscodeStream::new(stdout, self.chunk_size, move || {
            handle.terminate_detached()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_encoder_is_an_error() {
        let streamer = PodcastSeekStreamer::new("/nonexistent/zenith/ffmpeg", "/podcast.mp3", 1024);
        assert!(streamer.stream(0).is_err());
    }
}
