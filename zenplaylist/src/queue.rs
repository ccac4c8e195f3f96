//! File de lecture de l'album en cours
//!
//! La file tient la playlist, la position courante et le drapeau de
//! première lecture. Juste après un changement d'album, la première
//! demande sert le morceau en position 0 sans avancer ; les suivantes
//! avancent d'un cran et rebouclent en fin d'album.

use crate::track::{Playlist, Track};
use crate::{Error, Result};

/// État observable de la file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    /// Aucune playlist n'a encore été chargée
    Idle,
    /// Une playlist est en place
    Ready,
}

#[derive(Debug, Default)]
pub struct QueueState {
    playlist: Option<Playlist>,
    position: usize,
    first_play: bool,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> QueueStatus {
        match self.playlist {
            Some(_) => QueueStatus::Ready,
            None => QueueStatus::Idle,
        }
    }

    /// Remplace la playlist en bloc et rembobine la file
    pub fn replace(&mut self, playlist: Playlist) {
        self.playlist = Some(playlist);
        self.position = 0;
        self.first_play = true;
    }

    /// Morceau à jouer maintenant.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPlaylist`] si aucune playlist n'est chargée ou si elle
    /// est vide ; l'état n'est alors pas modifié.
    pub fn next_track(&mut self) -> Result<&Track> {
        let playlist = match &self.playlist {
            Some(p) if !p.is_empty() => p,
            _ => return Err(Error::EmptyPlaylist),
        };

        if self.first_play {
            self.first_play = false;
        } else {
            self.position = (self.position + 1) % playlist.len();
        }

        playlist.get(self.position).ok_or(Error::EmptyPlaylist)
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_first_play(&self) -> bool {
        self.first_play
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::AudioExtension;

    fn playlist(names: &[&str]) -> Playlist {
        Playlist::from_unsorted(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| crate::Track::new(*n, AudioExtension::Mp3, i as u32 + 1))
                .collect(),
        )
    }

    #[test]
    fn test_idle_queue_rejects_next() {
        let mut queue = QueueState::new();
        assert_eq!(queue.status(), QueueStatus::Idle);
        assert!(matches!(queue.next_track(), Err(Error::EmptyPlaylist)));
    }

    #[test]
    fn test_first_play_then_advance_then_wrap() {
        let mut queue = QueueState::new();
        queue.replace(playlist(&["a.mp3", "b.mp3", "c.mp3"]));
        assert_eq!(queue.status(), QueueStatus::Ready);
        assert!(queue.is_first_play());

        assert_eq!(queue.next_track().unwrap().file_name(), "a.mp3");
        assert!(!queue.is_first_play());
        assert_eq!(queue.position(), 0);

        assert_eq!(queue.next_track().unwrap().file_name(), "b.mp3");
        assert_eq!(queue.next_track().unwrap().file_name(), "c.mp3");
        // retour au début après le dernier morceau
        assert_eq!(queue.next_track().unwrap().file_name(), "a.mp3");
        assert_eq!(queue.position(), 0);
    }

    #[test]
    fn test_n_minus_one_advances_return_to_start() {
        let names = ["1.mp3", "2.mp3", "3.mp3", "4.mp3", "5.mp3"];
        let mut queue = QueueState::new();
        queue.replace(playlist(&names));

        assert_eq!(queue.next_track().unwrap().file_name(), "1.mp3");
        assert_eq!(queue.next_track().unwrap().file_name(), "2.mp3");

        let mut last = String::new();
        for _ in 0..names.len() - 1 {
            last = queue.next_track().unwrap().file_name().to_string();
        }
        assert_eq!(last, "1.mp3");
        assert_eq!(queue.position(), 0);
    }

    #[test]
    fn test_replace_resets_position_and_first_play() {
        let mut queue = QueueState::new();
        queue.replace(playlist(&["a.mp3", "b.mp3"]));
        queue.next_track().unwrap();
        queue.next_track().unwrap();
        assert_eq!(queue.position(), 1);

        queue.replace(playlist(&["x.mp3", "y.mp3"]));
        assert_eq!(queue.position(), 0);
        assert!(queue.is_first_play());
        assert_eq!(queue.next_track().unwrap().file_name(), "x.mp3");
    }

    #[test]
    fn test_single_track_loops() {
        let mut queue = QueueState::new();
        queue.replace(playlist(&["only.mp3"]));
        for _ in 0..3 {
            assert_eq!(queue.next_track().unwrap().file_name(), "only.mp3");
        }
    }

    #[test]
    fn test_empty_playlist_keeps_first_play() {
        let mut queue = QueueState::new();
        queue.replace(Playlist::default());
        assert!(matches!(queue.next_track(), Err(Error::EmptyPlaylist)));
        assert!(queue.is_first_play());
    }
}
