//! # zenserver - Serveurs HTTP de la machine de diffusion, basés sur Axum
//!
//! Cette crate fournit une abstraction simple pour les deux écouteurs HTTP
//! de la machine : le service de flux (lu par la radio) et le service de
//! sélection d'album (utilisé depuis un navigateur).
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : routes JSON, handlers avec état, sous-routers
//! - 📡 **Logs** : initialisation du tracing et réglage du niveau à chaud
//! - ⚡ **Arrêt gracieux** : un `CancellationToken` partagé arrête tous les serveurs
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use zenserver::{ServerBuilder, logs::init_logging};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let log_state = init_logging();
//!
//!     let mut server = ServerBuilder::browse_configured().build();
//!     server.add_log_routes(log_state).await;
//!     server.add_route("/info", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     let shutdown = CancellationToken::new();
//!     server.start(shutdown.clone()).await?;
//!     tokio::signal::ctrl_c().await?;
//!     shutdown.cancel();
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, init_logging};
pub use server::{Server, ServerBuilder, ServerInfo};
