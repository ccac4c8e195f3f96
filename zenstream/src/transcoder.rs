//! # Transcoder
//!
//! Lancement d'`ffmpeg` avec un jeu d'arguments fixe et possession du
//! processus enfant.
//!
//! ## Cycle de vie
//!
//! ```text
//! spawn() ──> TranscodeHandle ──> terminate()   (kill + wait)
//!                 │
//!                 └── stdout ──> TranscodeStream ──> corps HTTP
//! ```
//!
//! Chaque enfant est créé avec `kill_on_drop` : même un handle oublié
//! n'emporte pas d'encodeur orphelin avec lui.

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info, warn};

/// Type MIME du flux principal (Ogg Vorbis)
pub const PRIMARY_CONTENT_TYPE: &str = "audio/ogg";

/// Type MIME du flux podcast (MP3)
pub const PODCAST_CONTENT_TYPE: &str = "audio/mpeg";

/// Arguments du flux principal : Vorbis 256k en temps réel vers stdout
pub fn primary_args(input: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-vn", "-re", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args.extend(
        ["-codec:a", "libvorbis", "-b:a", "256k", "-f", "ogg", "-"]
            .into_iter()
            .map(OsString::from),
    );
    args
}

/// Arguments du flux podcast : MP3 à partir de `offset_seconds`
pub fn podcast_args(input: &Path, offset_seconds: u64) -> Vec<OsString> {
    let mut args = vec![
        OsString::from("-ss"),
        OsString::from(offset_seconds.to_string()),
        OsString::from("-i"),
    ];
    args.push(input.as_os_str().to_owned());
    args.extend(["-f", "mp3", "-"].into_iter().map(OsString::from));
    args
}

/// Un processus d'encodage vivant
#[derive(Debug)]
pub struct TranscodeHandle {
    child: Child,
    label: String,
}

impl TranscodeHandle {
    /// Lance `program` et sépare sa sortie standard du handle
    pub fn spawn(
        program: &Path,
        args: Vec<OsString>,
        label: impl Into<String>,
    ) -> Result<(Self, ChildStdout)> {
        let label = label.into();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: PathBuf::from(program),
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            // kill_on_drop se charge de l'enfant
            return Err(Error::NoStdout(PathBuf::from(program)));
        };

        info!(pid = ?child.id(), encoder = %label, "Encoder started");
        Ok((Self { child, label }, stdout))
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Tue le processus et attend sa fin
    pub async fn terminate(mut self) {
        let pid = self.child.id();
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(?pid, encoder = %self.label, %status, "Encoder already exited");
            }
            _ => match self.child.kill().await {
                Ok(()) => info!(?pid, encoder = %self.label, "Encoder terminated"),
                Err(e) => warn!(?pid, encoder = %self.label, "Failed to kill encoder: {}", e),
            },
        }
    }

    /// Arrêt hors de tout contexte async : délégué au runtime courant,
    /// sinon `kill_on_drop` prend le relais
    pub fn terminate_detached(self) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(self.terminate());
            }
            Err(_) => drop(self),
        }
    }
}
