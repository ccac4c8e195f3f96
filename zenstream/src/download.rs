//! Téléchargement du podcast configuré
//!
//! Le fichier est écrit à côté de sa destination avec l'extension
//! `.part`, puis renommé : un téléchargement interrompu ne remplace pas
//! le podcast en place.

use crate::{Error, Result};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PodcastDownloader {
    client: reqwest::Client,
    url: Option<String>,
    save_path: PathBuf,
}

impl PodcastDownloader {
    /// `url` vaut `None` quand aucune source n'est configurée
    pub fn new(url: Option<String>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            save_path: save_path.into(),
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Télécharge le podcast et retourne le nombre d'octets écrits
    pub async fn download(&self) -> Result<u64> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| Error::download("No podcast URL configured"))?;

        info!(url, dest = %self.save_path.display(), "Downloading podcast");
        match self.fetch(url).await {
            Ok(size) => {
                info!(size, "Podcast downloaded");
                Ok(size)
            }
            Err(e) => {
                warn!(url, "Podcast download failed: {}", e);
                Err(e)
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::download(e.to_string()))?;

        if let Some(parent) = self.save_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let part = part_path(&self.save_path);
        let mut file = tokio::fs::File::create(&part).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(&part).await;
                    return Err(Error::download(format!("Failed to read chunk: {}", e)));
                }
            };
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        drop(file);
        tokio::fs::rename(&part, &self.save_path).await?;
        Ok(written)
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/srv/podcast.mp3")),
            PathBuf::from("/srv/podcast.mp3.part")
        );
    }

    #[tokio::test]
    async fn test_missing_url_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = PodcastDownloader::new(None, dir.path().join("podcast.mp3"));
        let err = downloader.download().await.unwrap_err();
        assert!(matches!(err, Error::Download(_)));
        assert!(!downloader.save_path().exists());
    }

    #[tokio::test]
    async fn test_unreachable_url_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = PodcastDownloader::new(
            Some("http://127.0.0.1:1/podcast.mp3".to_string()),
            dir.path().join("podcast.mp3"),
        );
        assert!(downloader.download().await.is_err());
        assert!(!downloader.save_path().exists());
    }
}
