// logs.rs
//! Initialisation du tracing et réglage du niveau de log à chaud.

use std::sync::{Arc, PoisonError, RwLock};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, reload, util::SubscriberInitExt,
};
use zenconfig::get_config;

const AVAILABLE_LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

/// Niveau de log courant et poignée de rechargement du filtre
#[derive(Clone)]
pub struct LogState {
    max_level: Arc<RwLock<Level>>,
    reload_handle: reload::Handle<LevelFilter, Registry>,
}

impl LogState {
    pub fn new(level: Level, reload_handle: reload::Handle<LevelFilter, Registry>) -> Self {
        Self {
            max_level: Arc::new(RwLock::new(level)),
            reload_handle,
        }
    }

    pub fn set_max_level(&self, level: Level) {
        *self
            .max_level
            .write()
            .unwrap_or_else(PoisonError::into_inner) = level;

        // Recharger le filtre dynamiquement
        let level_filter = LevelFilter::from_level(level);
        if let Err(e) = self.reload_handle.reload(level_filter) {
            eprintln!("❌ Failed to reload log level filter: {}", e);
        }
    }

    pub fn get_max_level(&self) -> Level {
        *self
            .max_level
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Initialise le système de logging
///
/// Le niveau initial et la sortie console viennent de la configuration
/// (`host.logger.min_level`, `host.logger.enable_console`).
///
/// # Retourne
/// Le `LogState` à passer à [`crate::Server::add_log_routes`]
pub fn init_logging() -> LogState {
    let config = get_config();

    let level = string_to_level(&config.get_log_min_level()).unwrap_or(Level::INFO);
    let (filter, reload_handle) = reload::Layer::new(LevelFilter::from_level(level));
    let log_state = LogState::new(level, reload_handle);

    // Le filtre rechargeable est appliqué en premier
    let subscriber = Registry::default().with(filter);

    let result = if config.get_log_enable_console() {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("⚠️ Tracing subscriber already installed: {}", e);
    }

    log_state
}

/// Request body pour la configuration du logging
#[derive(Debug, Deserialize)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Response pour la configuration du logging
#[derive(Debug, Serialize)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

impl LogSetupResponse {
    fn for_level(level: Level) -> Self {
        Self {
            current_level: level_to_string(level),
            available_levels: AVAILABLE_LEVELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Handler pour GET /api/log_setup - retourne la configuration actuelle
pub async fn log_setup_get(State(state): State<LogState>) -> impl IntoResponse {
    Json(LogSetupResponse::for_level(state.get_max_level()))
}

/// Handler pour POST /api/log_setup - met à jour le niveau de log
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> impl IntoResponse {
    let Some(level) = string_to_level(&payload.level) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "Invalid log level. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE"
            })),
        )
            .into_response();
    };

    state.set_max_level(level);
    tracing::info!("Log level changed to: {}", payload.level);

    (StatusCode::OK, Json(LogSetupResponse::for_level(level))).into_response()
}

fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_to_string(level: Level) -> String {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
    .to_string()
}

/// Crée le router pour l'API de gestion des logs
pub fn create_logs_router(log_state: LogState) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route("/log_setup", get(log_setup_get).post(log_setup_post))
        .with_state(log_state)
}
