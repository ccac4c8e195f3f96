//! Extension de zenconfig pour la diffusion

use crate::download::PodcastDownloader;
use crate::jukebox::Jukebox;
use crate::podcast::PodcastSeekStreamer;
use crate::process_manager::PlaybackProcessManager;
use anyhow::Result;
use tracing::warn;
use zenplaylist::LibraryConfigExt;

/// Trait d'extension pour zenconfig::Config
pub trait StreamConfigExt {
    /// Gestionnaire de l'encodeur principal (`tools.ffmpeg`, `stream.chunk_size`)
    fn playback_manager(&self) -> PlaybackProcessManager;

    /// Jukebox sur `library.music_dir`, file vide
    fn jukebox(&self) -> Result<Jukebox>;

    /// Lecteur du podcast `podcast.file`
    fn podcast_streamer(&self) -> Result<PodcastSeekStreamer>;

    /// Téléchargeur `podcast.url` vers `podcast.save_path`
    fn podcast_downloader(&self) -> Result<PodcastDownloader>;
}

impl StreamConfigExt for zenconfig::Config {
    fn playback_manager(&self) -> PlaybackProcessManager {
        PlaybackProcessManager::new(self.get_ffmpeg_path(), self.get_chunk_size())
    }

    fn jukebox(&self) -> Result<Jukebox> {
        Ok(Jukebox::new(
            self.get_music_dir()?,
            self.playlist_builder(),
            self.playback_manager(),
        ))
    }

    fn podcast_streamer(&self) -> Result<PodcastSeekStreamer> {
        Ok(PodcastSeekStreamer::new(
            self.get_ffmpeg_path(),
            self.get_podcast_file()?,
            self.get_chunk_size(),
        ))
    }

    fn podcast_downloader(&self) -> Result<PodcastDownloader> {
        // Sans URL, le service démarre et /download répond 500
        let url = match self.get_podcast_url() {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        Ok(PodcastDownloader::new(url, self.get_podcast_save_path()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_follow_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let config = zenconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();
        config.set_chunk_size(4096).unwrap();
        config
            .set_value(
                &["podcast", "save_path"],
                serde_yaml::Value::String("podcasts/latest.mp3".into()),
            )
            .unwrap();

        assert_eq!(config.playback_manager().chunk_size(), 4096);

        config.set_music_dir("library").unwrap();
        assert_eq!(
            config.jukebox().unwrap().music_dir(),
            dir.path().join("library")
        );

        let downloader = config.podcast_downloader().unwrap();
        assert_eq!(
            downloader.save_path(),
            dir.path().join("podcasts").join("latest.mp3")
        );
    }
}
