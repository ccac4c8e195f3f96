//! # zenplaylist - Albums, ordre des pistes et file de lecture
//!
//! Cette crate fournit :
//! - la résolution du numéro de piste d'un fichier (`ffprobe`)
//! - la construction de la playlist ordonnée d'un répertoire d'album
//! - la file de lecture (position courante, première lecture, rebouclage)
//! - la persistance de la sélection (artiste, album) en cours
//! - le parcours de l'arborescence `<music_dir>/<artist>/<album>`
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use zenplaylist::{AlbumPlaylistBuilder, FfprobeResolver, QueueState};
//!
//! # #[tokio::main]
//! # async fn main() -> zenplaylist::Result<()> {
//! let builder = AlbumPlaylistBuilder::new(Arc::new(FfprobeResolver::default()));
//! let playlist = builder
//!     .build(Path::new("/home/zenith/Music/Eric Clapton/MTV Unplugged"))
//!     .await?;
//!
//! let mut queue = QueueState::new();
//! queue.replace(playlist);
//! let first = queue.next_track()?;
//! println!("Playing: {}", first.file_name());
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
pub mod library;
mod order;
mod queue;
mod selection;
mod track;

#[cfg(feature = "zenconfig")]
mod config_ext;

// Réexports publics
pub use builder::AlbumPlaylistBuilder;
pub use error::{Error, Result};
pub use order::{parse_track_number, FfprobeResolver, TrackOrderResolver, SENTINEL_ORDER_KEY};
pub use queue::{QueueState, QueueStatus};
pub use selection::{NowPlayingStore, Selection};
pub use track::{AudioExtension, Playlist, Track};

#[cfg(feature = "zenconfig")]
pub use config_ext::LibraryConfigExt;
