//! Morceau d'un album et liste ordonnée de morceaux

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Extensions audio reconnues dans un répertoire d'album
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioExtension {
    Mp3,
    Ogg,
}

impl AudioExtension {
    pub const ALL: [AudioExtension; 2] = [AudioExtension::Mp3, AudioExtension::Ogg];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioExtension::Mp3 => "mp3",
            AudioExtension::Ogg => "ogg",
        }
    }

    /// Extension reconnue pour ce nom de fichier (insensible à la casse)
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|candidate| ext.eq_ignore_ascii_case(candidate.as_str()))
    }
}

impl fmt::Display for AudioExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un fichier audio d'un album, sans son répertoire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    file_name: String,
    extension: AudioExtension,
    #[serde(skip)]
    order_key: u32,
}

impl Track {
    pub fn new(file_name: impl Into<String>, extension: AudioExtension, order_key: u32) -> Self {
        Self {
            file_name: file_name.into(),
            extension,
            order_key,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn extension(&self) -> AudioExtension {
        self.extension
    }

    pub fn order_key(&self) -> u32 {
        self.order_key
    }
}

/// Séquence ordonnée de morceaux, remplacée en bloc à chaque changement d'album
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Trie les morceaux par clé d'ordre.
    ///
    /// Le tri est stable : à clé égale (sentinelle comprise), l'ordre
    /// d'entrée est conservé.
    pub fn from_unsorted(mut tracks: Vec<Track>) -> Self {
        tracks.sort_by_key(Track::order_key);
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.file_name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        assert_eq!(AudioExtension::from_file_name("a.mp3"), Some(AudioExtension::Mp3));
        assert_eq!(AudioExtension::from_file_name("B.OGG"), Some(AudioExtension::Ogg));
        assert_eq!(AudioExtension::from_file_name("cover.jpg"), None);
        assert_eq!(AudioExtension::from_file_name("mp3"), None);
        assert_eq!(AudioExtension::from_file_name("notes.mp3.txt"), None);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let playlist = Playlist::from_unsorted(vec![
            Track::new("z.mp3", AudioExtension::Mp3, 9999),
            Track::new("two.mp3", AudioExtension::Mp3, 2),
            Track::new("y.ogg", AudioExtension::Ogg, 9999),
            Track::new("one-b.mp3", AudioExtension::Mp3, 1),
            Track::new("one-a.mp3", AudioExtension::Mp3, 1),
        ]);

        assert_eq!(
            playlist.file_names(),
            vec!["one-b.mp3", "one-a.mp3", "two.mp3", "z.mp3", "y.ogg"]
        );
    }

    #[test]
    fn test_track_serializes_without_order_key() {
        let json = serde_json::to_value(Track::new("a.mp3", AudioExtension::Mp3, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"file_name": "a.mp3", "extension": "mp3"}));
    }
}
