//! Parcours de l'arborescence `<music_dir>/<artist>/<album>`

use crate::selection::Selection;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Un nom d'artiste ou d'album ne doit désigner qu'un seul niveau
fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Noms des sous-répertoires de `dir`, triés
async fn sorted_subdirectories(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                warn!(dir = %dir.display(), name = ?raw, "Skipping non UTF-8 directory name")
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Artistes disponibles
///
/// # Errors
///
/// [`Error::Io`] si la racine musicale est illisible.
pub async fn list_artists(music_dir: &Path) -> Result<Vec<String>> {
    Ok(sorted_subdirectories(music_dir).await?)
}

/// Albums d'un artiste
///
/// # Errors
///
/// [`Error::ArtistNotFound`] si le répertoire de l'artiste n'existe pas.
pub async fn list_albums(music_dir: &Path, artist: &str) -> Result<Vec<String>> {
    let not_found = || Error::ArtistNotFound(artist.to_string());
    if !is_plain_component(artist) {
        return Err(not_found());
    }

    let artist_dir = music_dir.join(artist);
    match tokio::fs::metadata(&artist_dir).await {
        Ok(m) if m.is_dir() => {}
        _ => return Err(not_found()),
    }

    sorted_subdirectories(&artist_dir)
        .await
        .map_err(|_| not_found())
}

/// Chemin du répertoire d'album d'une sélection
///
/// L'existence n'est pas vérifiée ici ; seuls les noms qui sortiraient de
/// la racine musicale sont refusés.
pub fn album_dir(music_dir: &Path, selection: &Selection) -> Result<PathBuf> {
    if is_plain_component(&selection.artist) && is_plain_component(&selection.album) {
        Ok(music_dir.join(&selection.artist).join(&selection.album))
    } else {
        Err(Error::AlbumNotFound(
            music_dir.join(&selection.artist).join(&selection.album),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for path in [
            "Eric Clapton/MTV Unplugged",
            "Eric Clapton/Slowhand",
            "B.B. King/Live at the Regal",
        ] {
            std::fs::create_dir_all(dir.path().join(path)).unwrap();
        }
        std::fs::write(dir.path().join("README.txt"), b"").unwrap();
        std::fs::write(dir.path().join("Eric Clapton").join("cover.jpg"), b"").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_list_artists_sorted_directories_only() {
        let dir = library();
        assert_eq!(
            list_artists(dir.path()).await.unwrap(),
            vec!["B.B. King", "Eric Clapton"]
        );
    }

    #[tokio::test]
    async fn test_list_albums() {
        let dir = library();
        assert_eq!(
            list_albums(dir.path(), "Eric Clapton").await.unwrap(),
            vec!["MTV Unplugged", "Slowhand"]
        );
    }

    #[tokio::test]
    async fn test_unknown_artist_is_not_found() {
        let dir = library();
        let err = list_albums(dir.path(), "UnknownArtist").await.unwrap_err();
        assert!(matches!(err, Error::ArtistNotFound(ref a) if a == "UnknownArtist"));
        assert!(list_albums(dir.path(), "..").await.unwrap_err().is_not_found());
        assert!(list_albums(dir.path(), "README.txt").await.is_err());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_artist_is_skipped() {
        use std::os::unix::ffi::OsStrExt;

        let dir = library();
        let raw = std::ffi::OsStr::from_bytes(b"Bj\xf6rk");
        std::fs::create_dir(dir.path().join(raw)).unwrap();

        assert_eq!(
            list_artists(dir.path()).await.unwrap(),
            vec!["B.B. King", "Eric Clapton"]
        );
    }

    #[test]
    fn test_album_dir_rejects_traversal() {
        let root = Path::new("/music");
        assert_eq!(
            album_dir(root, &Selection::new("Eric Clapton", "Slowhand")).unwrap(),
            PathBuf::from("/music/Eric Clapton/Slowhand")
        );
        assert!(album_dir(root, &Selection::new("..", "etc")).is_err());
        assert!(album_dir(root, &Selection::new("a", "b/../../c")).is_err());
    }
}
