#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zenplaylist::{AlbumPlaylistBuilder, FfprobeResolver, QueueState};

/// Faux `ffprobe` : le numéro de piste est lu dans le contenu du fichier
fn fake_ffprobe(dir: &Path) -> PathBuf {
    let script = dir.join("ffprobe");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         [ -f \"$5\" ] || exit 1\n\
         echo '[FORMAT]'\n\
         echo \"filename=$5\"\n\
         cat \"$5\"\n\
         echo '[/FORMAT]'\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn album(tracks: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let album_dir = root.path().join("Artist").join("Album");
    std::fs::create_dir_all(&album_dir).unwrap();
    for (name, tags) in tracks {
        std::fs::write(album_dir.join(name), tags).unwrap();
    }
    (root, album_dir)
}

#[tokio::test]
async fn test_album_sorted_by_embedded_track_number() {
    let (root, album_dir) = album(&[
        ("b.mp3", "TAG:track=2\n"),
        ("a.mp3", "TAG:track=1/3\n"),
        ("c.mp3", "TAG:title=Untagged\n"),
        ("folder.jpg", ""),
    ]);
    let builder = AlbumPlaylistBuilder::new(Arc::new(FfprobeResolver::new(fake_ffprobe(
        root.path(),
    ))));

    let playlist = builder.build(&album_dir).await.unwrap();
    assert_eq!(playlist.file_names(), vec!["a.mp3", "b.mp3", "c.mp3"]);
}

#[tokio::test]
async fn test_untagged_tracks_keep_listing_order_at_the_end() {
    let (root, album_dir) = album(&[
        ("z-bonus.ogg", "junk\n"),
        ("m-bonus.mp3", "TAG:track=oops\n"),
        ("03.mp3", "TAG:TRACK=3/10\n"),
        ("a-bonus.mp3", ""),
        ("10.ogg", "TAG:Track=10\n"),
    ]);
    let builder = AlbumPlaylistBuilder::new(Arc::new(FfprobeResolver::new(fake_ffprobe(
        root.path(),
    ))));

    let playlist = builder.build(&album_dir).await.unwrap();
    assert_eq!(
        playlist.file_names(),
        vec!["03.mp3", "10.ogg", "a-bonus.mp3", "m-bonus.mp3", "z-bonus.ogg"]
    );
}

#[tokio::test]
async fn test_queue_walks_the_built_album() {
    let (root, album_dir) = album(&[
        ("two.mp3", "TAG:track=2\n"),
        ("one.mp3", "TAG:track=1\n"),
    ]);
    let builder = AlbumPlaylistBuilder::new(Arc::new(FfprobeResolver::new(fake_ffprobe(
        root.path(),
    ))));

    let mut queue = QueueState::new();
    queue.replace(builder.build(&album_dir).await.unwrap());

    let played: Vec<String> = (0..5)
        .map(|_| queue.next_track().unwrap().file_name().to_string())
        .collect();
    assert_eq!(played, vec!["one.mp3", "two.mp3", "one.mp3", "two.mp3", "one.mp3"]);
}
