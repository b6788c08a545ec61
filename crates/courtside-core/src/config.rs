// Configuration loading and parsing (config/courtside.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "courtside.toml";

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "COURTSIDE_API_URL";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub live: LiveSettings,
    pub storage: StorageConfig,
    pub landing: LandingConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// `None` means requests may hang indefinitely.
    pub timeout: Option<Duration>,
}

/// Reconnect policy for the live box-score socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSettings {
    pub reconnect: bool,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            reconnect: true,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(5),
            max_attempts: Some(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Explicit token database path. `None` resolves to the platform data dir.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LandingConfig {
    pub featured_limit: u32,
}

// ---------------------------------------------------------------------------
// courtside.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConfigFile {
    api: ApiSection,
    #[serde(default)]
    live: Option<LiveSection>,
    #[serde(default)]
    storage: Option<StorageSection>,
    #[serde(default)]
    landing: Option<LandingSection>,
}

#[derive(Debug, Deserialize)]
struct ApiSection {
    base_url: String,
    #[serde(default)]
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct LiveSection {
    #[serde(default = "default_true")]
    reconnect: bool,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    #[serde(default)]
    max_attempts: u32,
}

#[derive(Debug, Deserialize)]
struct StorageSection {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Deserialize)]
struct LandingSection {
    featured_limit: u32,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `config/courtside.toml` relative to `base_dir`. Does not copy
/// defaults and does not read the environment.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Parse and validate config text. `path` is only used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let base_url = parse_base_url(&file.api.base_url)?;
    let timeout = (file.api.timeout_secs > 0).then(|| Duration::from_secs(file.api.timeout_secs));

    let live = match file.live {
        Some(section) => LiveSettings {
            reconnect: section.reconnect,
            initial_backoff: Duration::from_millis(section.initial_backoff_ms),
            max_backoff: Duration::from_millis(section.max_backoff_ms),
            max_attempts: (section.max_attempts > 0).then_some(section.max_attempts),
        },
        None => LiveSettings::default(),
    };

    let storage = StorageConfig {
        path: file
            .storage
            .map(|s| s.path)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from),
    };

    let landing = LandingConfig {
        featured_limit: file.landing.map(|l| l.featured_limit).unwrap_or(4),
    };

    let config = Config {
        api: ApiConfig { base_url, timeout },
        live,
        storage,
        landing,
    };

    validate(&config)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` (normally `std::env::var`).
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = parse_base_url(&raw).map_err(|_| ConfigError::ValidationError {
            field: API_URL_ENV.into(),
            message: format!("not an http(s) URL: {raw}"),
        })?;
    }
    Ok(())
}

/// Seed `config/courtside.toml` from `defaults/` on first run. Returns the
/// path written, or `None` when a config file already exists.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(None);
    }
    if !source.is_file() {
        if config_dir.exists() {
            // load_config_from reports the missing file with its path.
            return Ok(None);
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/{CONFIG_FILE} nor config/ found in {}; \
                 run from the project root",
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", source.display()),
    })?;
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            tracing::info!(path = %target.display(), "seeded config from defaults");
            Ok(Some(target))
        }
        // Another process seeded it first.
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Loads config relative to the current working directory, copying defaults
/// first and applying `COURTSIDE_API_URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

impl ApiConfig {
    /// WebSocket origin derived from the HTTP base URL (`http` to `ws`,
    /// `https` to `wss`). Path and port are kept.
    pub fn ws_base(&self) -> Url {
        let mut ws = self.base_url.clone();
        let scheme = if ws.scheme() == "https" { "wss" } else { "ws" };
        // http/https and ws/wss are all special schemes, so this cannot fail.
        let _ = ws.set_scheme(scheme);
        ws
    }
}

impl StorageConfig {
    /// Path of the SQLite file that holds the session token.
    pub fn token_db_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        directories::ProjectDirs::from("io", "courtside", "courtside")
            .map(|dirs| dirs.data_dir().join("courtside.db"))
            .unwrap_or_else(|| PathBuf::from("courtside.db"))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::ValidationError {
        field: "api.base_url".into(),
        message: format!("invalid URL `{raw}`: {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("scheme must be http or https, got `{}`", url.scheme()),
        });
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let live = &config.live;
    if live.initial_backoff.is_zero() {
        return Err(ConfigError::ValidationError {
            field: "live.initial_backoff_ms".into(),
            message: "must be greater than 0".into(),
        });
    }
    if live.max_backoff < live.initial_backoff {
        return Err(ConfigError::ValidationError {
            field: "live.max_backoff_ms".into(),
            message: format!(
                "must be >= initial_backoff_ms ({}), got {}",
                live.initial_backoff.as_millis(),
                live.max_backoff.as_millis()
            ),
        });
    }

    if config.landing.featured_limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "landing.featured_limit".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}
