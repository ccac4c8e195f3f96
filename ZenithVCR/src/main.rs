use anyhow::{Context, Result, bail};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use zenconfig::get_config;
use zenplaylist::LibraryConfigExt;
use zenserver::{ServerBuilder, init_logging};
use zenstream::{BrowseServerExt, StreamConfigExt, StreamServerExt};

const SERVER_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========
    zenconfig::Config::config_dir("").context("Configuration directory is unusable")?;
    let config = get_config();
    let log_state = init_logging();

    let music_dir = config.get_music_dir()?;
    if !music_dir.is_dir() {
        warn!(music_dir = %music_dir.display(), "Music directory does not exist");
    }

    // ========== PHASE 2 : Jukebox ==========
    let jukebox = config.jukebox()?;
    let store = config.now_playing_store();

    let persisted = store.load().await;
    info!("🎵 Loading {} / {}...", persisted.artist, persisted.album);
    if let Err(e) = jukebox.select_album(persisted.clone()).await {
        let fallback = store.default_selection().clone();
        if fallback == persisted {
            bail!("Cannot load default album {} / {}: {}", fallback.artist, fallback.album, e);
        }
        warn!("⚠️ Cannot load {} / {}: {}", persisted.artist, persisted.album, e);
        jukebox.select_album(fallback.clone()).await.with_context(|| {
            format!("Cannot load default album {} / {}", fallback.artist, fallback.album)
        })?;
    }

    // ========== PHASE 3 : Services HTTP ==========
    let shutdown = CancellationToken::new();

    let mut stream_server = ServerBuilder::stream_configured().build();
    stream_server
        .init_stream_service(jukebox.clone(), config.podcast_streamer()?)
        .await;

    let mut browse_server = ServerBuilder::browse_configured().build();
    browse_server
        .init_browse_service(jukebox.clone(), config.podcast_downloader()?)
        .await;
    browse_server.add_log_routes(log_state).await;

    let stream_addr = stream_server.start(shutdown.clone()).await?;
    let browse_addr = browse_server.start(shutdown.clone()).await?;
    info!("✅ Streaming on http://{}/stream", stream_addr);
    info!("✅ Album selection on http://{}/", browse_addr);
    info!("Press Ctrl+C to stop...");

    shutdown_signal().await;

    // ========== PHASE 4 : Arrêt ==========
    info!("🛑 Shutting down...");
    shutdown.cancel();
    jukebox.shutdown().await;

    for server in [&mut stream_server, &mut browse_server] {
        if tokio::time::timeout(SERVER_STOP_TIMEOUT, server.wait())
            .await
            .is_err()
        {
            warn!(server = %server.info().name, "Server did not stop in time");
        }
    }

    match jukebox.now_playing().await {
        Some(selection) => store.save(&selection).await,
        None => error!("No album selected, now playing not saved"),
    }

    info!("👋 Bye");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let term = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let term = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = term => {},
    }
}
