//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module fournit une abstraction simple pour créer les serveurs HTTP de
//! la machine de diffusion (flux audio d'un côté, sélection d'album de
//! l'autre), en cachant la configuration du routage et de l'arrêt.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **Routes JSON simples** : endpoints API avec `add_route()`
//! - 🎯 **Handlers avec état** : `add_handler_with_state()` / `add_post_handler_with_state()`
//! - 🔀 **Sous-routers** : routes paramétrées avec `add_router()`
//! - ⚡ **Arrêt gracieux** : piloté par un `CancellationToken` partagé

use crate::logs::{LogState, create_logs_router};
use anyhow::{Context, Result};
use axum::handler::Handler;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use zenconfig::get_config;

/// Info serveur sérialisable
#[derive(Clone, Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub http_port: u16,
}

/// Serveur principal
pub struct Server {
    name: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `http_port` - Port HTTP à écouter (0 pour un port éphémère)
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
        }
    }

    /// Ajoute une route JSON dynamique
    ///
    /// La closure fournie est appelée à chaque requête GET sur le chemin.
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// # use zenserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// let mut server = Server::new("Test", 3000);
    /// server.add_route("/info", || async {
    ///     serde_json::json!({"version": "1.0.0"})
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = {
            let f = f.clone();
            move || {
                let f = f.clone();
                async move { Json(f().await) }
            }
        };

        self.mount(path, Router::new().route("/", get(handler))).await;
    }

    /// Ajoute un handler GET avec état
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route("/", get(handler)).with_state(state);
        self.mount(path, route).await;
    }

    /// Ajoute un handler POST avec état
    pub async fn add_post_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new().route("/", post(handler)).with_state(state);
        self.mount(path, route).await;
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let normalized = format!("/{}", path.trim_start_matches('/'));
        let mut r = self.router.write().await;
        *r = if normalized == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    async fn mount(&mut self, path: &str, route: Router) {
        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Enregistre `GET/POST /api/log_setup` pour piloter le niveau de log
    pub async fn add_log_routes(&mut self, log_state: LogState) {
        self.add_router("/api", create_logs_router(log_state)).await;
    }

    /// Copie du router courant (utile pour les tests sans socket)
    pub async fn router(&self) -> Router {
        self.router.read().await.clone()
    }

    /// Démarre le serveur HTTP
    ///
    /// Le port est réservé avant de rendre la main : une erreur de bind est
    /// remontée à l'appelant. Le service s'arrête quand `shutdown` est annulé.
    ///
    /// Retourne l'adresse effectivement écoutée.
    pub async fn start(&mut self, shutdown: CancellationToken) -> Result<SocketAddr> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("{}: unable to bind {}", self.name, addr))?;
        let local_addr = listener.local_addr()?;
        info!(server = %self.name, address = %local_addr, "Server running");

        let router = self.router.read().await.clone();
        let name = self.name.clone();
        self.join_handle = Some(tokio::spawn(async move {
            let serving = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(async move { shutdown.cancelled().await });
            if let Err(e) = serving.await {
                error!(server = %name, "Server terminated with error: {}", e);
            }
            info!(server = %name, "Server stopped");
        }));

        Ok(local_addr)
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Récupère les infos du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            http_port: self.http_port,
        }
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
        }
    }

    /// Serveur de diffusion (`/stream`, `/podcast`) sur le port configuré
    pub fn stream_configured() -> Self {
        let config = get_config();
        Self::new("ZenithStream", config.get_stream_port())
    }

    /// Serveur de sélection d'album sur le port configuré
    pub fn browse_configured() -> Self {
        let config = get_config();
        Self::new("ZenithAlbums", config.get_browse_port())
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = port;
        self
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.http_port)
    }
}
