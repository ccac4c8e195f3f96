//! # Zenith Configuration Module
//!
//! This module provides configuration management for the Zenith stream machine:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use zenconfig::get_config;
//!
//! // Get the global configuration
//! let config = get_config();
//!
//! // Access configuration values
//! let port = config.get_stream_port();
//! let music_dir = config.get_music_dir()?;
//!
//! // Update configuration values
//! config.set_stream_port(9000)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::info;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("zenith.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load Zenith configuration"));
}

const ENV_CONFIG_DIR: &str = "ZENITH_CONFIG";
const ENV_PREFIX: &str = "ZENITH_CONFIG__";

// Default values for configuration
const DEFAULT_STREAM_PORT: u16 = 8000;
const DEFAULT_BROWSE_PORT: u16 = 8001;
const DEFAULT_CHUNK_SIZE: usize = 1024;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;
const DEFAULT_ARTIST: &str = "Eric Clapton";
const DEFAULT_ALBUM: &str = "MTV Unplugged";
const DEFAULT_STATE_FILE: &str = "now_playing.txt";
const DEFAULT_FFMPEG: &str = "ffmpeg";
const DEFAULT_FFPROBE: &str = "ffprobe";

/// Macro to generate getter/setter for port values with default
macro_rules! impl_port_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> u16 {
            match self.get_value($path) {
                Ok(Value::Number(n)) => match n.as_u64().and_then(|p| u16::try_from(p).ok()) {
                    Some(port) => port,
                    None => {
                        tracing::warn!("Invalid port {}, using default {}", n, $default);
                        $default
                    }
                },
                Ok(Value::String(s)) => s.parse::<u16>().unwrap_or_else(|_| {
                    tracing::warn!("Invalid port '{}', using default {}", s, $default);
                    $default
                }),
                _ => $default,
            }
        }

        pub fn $setter(&self, port: u16) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(port)))
        }
    };
}

/// Macro to generate getter/setter for usize values with default
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> usize {
            match self.get_value($path) {
                Ok(Value::Number(n)) => n.as_u64().map(|v| v as usize).unwrap_or($default),
                _ => $default,
            }
        }

        pub fn $setter(&self, size: usize) -> Result<()> {
            let n = Number::from(size);
            self.set_value($path, Value::Number(n))
        }
    };
}

/// Macro to generate getter/setter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> bool {
            match self.get_value($path) {
                Ok(Value::Bool(b)) => b,
                _ => $default,
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Macro to generate getter/setter for string values with default
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> String {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.trim().is_empty() => s,
                _ => $default.to_string(),
            }
        }

        pub fn $setter(&self, value: &str) -> Result<()> {
            self.set_value($path, Value::String(value.to_string()))
        }
    };
}

/// Configuration manager for the stream machine
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters/setters for configuration values
///
/// # Examples
///
/// ```no_run
/// use zenconfig::get_config;
///
/// let config = get_config();
/// let port = config.get_browse_port();
/// println!("Browse port: {}", port);
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

// Implémentation manuelle de Clone
impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.lock_data().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(".zenith").exists() {
            return ".zenith".to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(".zenith");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        ".zenith".to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        // Create if doesn't exist
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        // Verify it's a directory
        if !path.is_dir() {
            return Err(anyhow!(
                "Config path {} is not a directory",
                path.display()
            ));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        // Test read permission
        fs::read_dir(path)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `ZENITH_CONFIG` environment variable
    /// 3. `.zenith` in the current directory
    /// 4. `.zenith` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for read/write permissions.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory containing the config.yaml file, or empty to use defaults
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file=%path, "Loaded config file");
            data
        } else {
            info!(config_file=%path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        // Merger avec la config par défaut
        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        merge_yaml(&mut default_value, &external_value);
        let mut config_value = Self::lower_keys_value(default_value);

        // Appliquer les overrides depuis les variables d'environnement
        Self::apply_env_overrides(&mut config_value);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    fn lock_data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let data = self.lock_data();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["host", "stream_port"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.lock_data();
        Self::set_value_internal(&mut data, path, value)?;
        drop(data);
        self.save()?;
        Ok(())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = path[0].to_lowercase();
            let key_value = Value::String(key.clone());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock_data();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                let key_path = key
                    .trim_start_matches(ENV_PREFIX)
                    .split("__")
                    .collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        let new_key = Value::String(s.to_lowercase());
                        let new_val = Self::lower_keys_value(v);
                        new_map.insert(new_key, new_val);
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Résout un chemin relatif par rapport au répertoire de configuration
    fn resolve_path(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.config_dir).join(path)
        }
    }

    /// Récupère un chemin obligatoire de la configuration
    fn get_required_path(&self, path: &[&str]) -> Result<PathBuf> {
        match self.get_value(path)? {
            Value::String(s) if !s.trim().is_empty() => Ok(self.resolve_path(s.trim())),
            _ => Err(anyhow!("{} must be a non-empty path", path.join("."))),
        }
    }

    /// Récupère le chemin d'un outil externe
    ///
    /// Un nom nu (`ffmpeg`) est laissé tel quel pour être résolu via `PATH`,
    /// un chemin relatif est résolu par rapport au répertoire de configuration.
    fn get_tool(&self, path: &[&str], default: &str) -> PathBuf {
        match self.get_value(path) {
            Ok(Value::String(s)) if !s.trim().is_empty() => {
                let s = s.trim();
                if s.contains(std::path::MAIN_SEPARATOR) || s.contains('/') {
                    self.resolve_path(s)
                } else {
                    PathBuf::from(s)
                }
            }
            _ => PathBuf::from(default),
        }
    }

    impl_port_config!(
        get_stream_port,
        set_stream_port,
        &["host", "stream_port"],
        DEFAULT_STREAM_PORT
    );

    impl_port_config!(
        get_browse_port,
        set_browse_port,
        &["host", "browse_port"],
        DEFAULT_BROWSE_PORT
    );

    /// Racine de la bibliothèque musicale (`<music_dir>/<artist>/<album>`)
    pub fn get_music_dir(&self) -> Result<PathBuf> {
        self.get_required_path(&["library", "music_dir"])
    }

    /// Définit la racine de la bibliothèque musicale
    pub fn set_music_dir(&self, directory: &str) -> Result<()> {
        self.set_value(&["library", "music_dir"], Value::String(directory.to_string()))
    }

    impl_string_config!(
        get_default_artist,
        set_default_artist,
        &["library", "default_artist"],
        DEFAULT_ARTIST
    );

    impl_string_config!(
        get_default_album,
        set_default_album,
        &["library", "default_album"],
        DEFAULT_ALBUM
    );

    /// Fichier du podcast diffusé sur `/podcast`
    pub fn get_podcast_file(&self) -> Result<PathBuf> {
        self.get_required_path(&["podcast", "file"])
    }

    /// URL de téléchargement du podcast (ce n'est pas le flux diffusé)
    pub fn get_podcast_url(&self) -> Result<String> {
        match self.get_value(&["podcast", "url"])? {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(anyhow!("podcast.url is not configured")),
        }
    }

    /// Destination du téléchargement `/download`
    pub fn get_podcast_save_path(&self) -> Result<PathBuf> {
        self.get_required_path(&["podcast", "save_path"])
    }

    /// Fichier de persistance de la sélection en cours
    pub fn get_state_file(&self) -> PathBuf {
        match self.get_value(&["state", "file"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => self.resolve_path(s.trim()),
            _ => self.resolve_path(DEFAULT_STATE_FILE),
        }
    }

    pub fn get_ffmpeg_path(&self) -> PathBuf {
        self.get_tool(&["tools", "ffmpeg"], DEFAULT_FFMPEG)
    }

    pub fn get_ffprobe_path(&self) -> PathBuf {
        self.get_tool(&["tools", "ffprobe"], DEFAULT_FFPROBE)
    }

    impl_usize_config!(
        get_chunk_size,
        set_chunk_size,
        &["stream", "chunk_size"],
        DEFAULT_CHUNK_SIZE
    );

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    impl_string_config!(
        get_log_min_level,
        set_log_min_level,
        &["host", "logger", "min_level"],
        DEFAULT_LOG_MIN_LEVEL
    );
}

/// Returns the global configuration instance
///
/// The instance is lazily loaded on first access.
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings (objects), it merges keys from external into default
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}
