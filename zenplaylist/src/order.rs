//! Clé d'ordre d'un morceau, lue dans ses métadonnées
//!
//! Les métadonnées sont lues avec `ffprobe`. Le numéro de piste peut être
//! au format `N` ou `N/total`. Tout échec (outil absent, code de sortie non
//! nul, champ manquant, valeur illisible) donne la clé sentinelle, ce qui
//! range le fichier en fin d'album sans interrompre la construction de la
//! playlist.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Clé des fichiers dont le numéro de piste est inconnu
pub const SENTINEL_ORDER_KEY: u32 = 9999;

/// Source de clés d'ordre pour les fichiers d'un album
#[async_trait]
pub trait TrackOrderResolver: Send + Sync {
    /// Ne remonte jamais d'erreur : un échec donne [`SENTINEL_ORDER_KEY`]
    async fn order_key(&self, path: &Path) -> u32;
}

/// Résolution via `ffprobe -show_format -show_streams`
#[derive(Debug, Clone)]
pub struct FfprobeResolver {
    program: PathBuf,
}

impl FfprobeResolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn probe(&self, path: &Path) -> Result<String, String> {
        let output = Command::new(&self.program)
            .args(["-v", "quiet", "-show_format", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", self.program.display(), e))?;

        if !output.status.success() {
            return Err(format!("{} exited with {}", self.program.display(), output.status));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for FfprobeResolver {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl TrackOrderResolver for FfprobeResolver {
    async fn order_key(&self, path: &Path) -> u32 {
        let key = match self.probe(path).await {
            Ok(output) => parse_track_number(&output),
            Err(e) => {
                warn!(file = %path.display(), "Error reading track number: {}", e);
                return SENTINEL_ORDER_KEY;
            }
        };

        match key {
            Some(n) => {
                debug!(file = %path.display(), track = n, "Track number resolved");
                n
            }
            None => {
                warn!(file = %path.display(), "No usable track number, sorting last");
                SENTINEL_ORDER_KEY
            }
        }
    }
}

/// Extrait le numéro de piste d'une sortie `ffprobe`.
///
/// Seule la première ligne contenant `track=` (casse ignorée) est lue.
pub fn parse_track_number(output: &str) -> Option<u32> {
    let line = output
        .lines()
        .find(|line| line.to_lowercase().contains("track="))?;
    let value = line.split('=').nth(1)?;
    let number = value.split('/').next()?.trim();
    number.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE_OUTPUT: &str = "\
[FORMAT]
filename=/music/a.mp3
nb_streams=1
format_name=mp3
TAG:title=Signe
TAG:artist=Eric Clapton
TAG:track=2/14
TAG:disc=1/1
[/FORMAT]
";

    #[test]
    fn test_parse_track_with_total() {
        assert_eq!(parse_track_number(PROBE_OUTPUT), Some(2));
    }

    #[test]
    fn test_parse_track_plain_and_case_insensitive() {
        assert_eq!(parse_track_number("TAG:TRACK=7\n"), Some(7));
        assert_eq!(parse_track_number("TAG:Track= 11 \n"), Some(11));
    }

    #[test]
    fn test_parse_track_missing_or_invalid() {
        assert_eq!(parse_track_number("TAG:title=Layla\n"), None);
        assert_eq!(parse_track_number("TAG:track=\n"), None);
        assert_eq!(parse_track_number("TAG:track=A1\n"), None);
        assert_eq!(parse_track_number("TAG:track=-3\n"), None);
        // la première occurrence fait foi
        assert_eq!(parse_track_number("TAG:track=x\nTAG:track=4\n"), None);
    }

    #[tokio::test]
    async fn test_missing_probe_gives_sentinel() {
        let resolver = FfprobeResolver::new("/nonexistent/zenith/ffprobe");
        assert_eq!(
            resolver.order_key(Path::new("/tmp/a.mp3")).await,
            SENTINEL_ORDER_KEY
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_script_output_is_parsed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ffprobe");
        std::fs::write(
            &script,
            "#!/bin/sh\ncase \"$5\" in\n  *fail*) exit 1 ;;\n  *) echo 'TAG:track=5/9' ;;\nesac\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let resolver = FfprobeResolver::new(&script);
        assert_eq!(resolver.order_key(Path::new("/music/a.mp3")).await, 5);
        assert_eq!(
            resolver.order_key(Path::new("/music/fail.mp3")).await,
            SENTINEL_ORDER_KEY
        );
    }
}
