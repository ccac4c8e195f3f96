#![allow(dead_code)]

use async_trait::async_trait;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zenplaylist::{AlbumPlaylistBuilder, SENTINEL_ORDER_KEY, TrackOrderResolver};
use zenstream::{Jukebox, PlaybackProcessManager};

/// Numéro de piste lu dans le contenu du fichier (`track=N`)
pub struct ContentKeys;

#[async_trait]
impl TrackOrderResolver for ContentKeys {
    async fn order_key(&self, path: &Path) -> u32 {
        tokio::fs::read_to_string(path)
            .await
            .ok()
            .and_then(|c| zenplaylist::parse_track_number(&c))
            .unwrap_or(SENTINEL_ORDER_KEY)
    }
}

/// Faux `ffmpeg` : écrit ses arguments sur stdout puis reste en vie
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    let script = dir.join("ffmpeg");
    std::fs::write(&script, "#!/bin/sh\nprintf '%s ' \"$@\"\necho\nexec sleep 30\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// Faux `ffmpeg` : écrit son propre pid puis reste en vie
pub fn fake_ffmpeg_pid(dir: &Path) -> PathBuf {
    let script = dir.join("ffmpeg-pid");
    std::fs::write(&script, "#!/bin/sh\necho $$\nexec sleep 30\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

/// Bibliothèque `Artist/Album` de trois pistes, `c.mp3` sans numéro
pub fn library() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let album = root.path().join("music").join("Artist").join("Album");
    std::fs::create_dir_all(&album).unwrap();
    std::fs::create_dir_all(root.path().join("music").join("Other").join("Live")).unwrap();
    for (name, content) in [
        ("b.mp3", "TAG:track=2\n"),
        ("a.mp3", "TAG:track=1/3\n"),
        ("c.mp3", "TAG:title=none\n"),
        ("notes.txt", "TAG:track=0\n"),
    ] {
        std::fs::write(album.join(name), content).unwrap();
    }
    root
}

pub fn jukebox(root: &TempDir, ffmpeg: impl Into<PathBuf>) -> Jukebox {
    Jukebox::new(
        root.path().join("music"),
        AlbumPlaylistBuilder::new(Arc::new(ContentKeys)),
        PlaybackProcessManager::new(ffmpeg, 1024),
    )
}

pub fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}
