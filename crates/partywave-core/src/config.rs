// Configuration loading and parsing (admin.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Built-in copy of `defaults/admin.toml`, written out when neither a
/// `defaults/` directory nor an existing config is available.
const EMBEDDED_ADMIN_TOML: &str = include_str!("../../../defaults/admin.toml");

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "PARTYWAVE_API_URL";

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
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    pub credentials: CredentialsConfig,
}

/// Raw deserialization target for admin.toml.
#[derive(Debug, Clone, Deserialize)]
struct AdminFile {
    api: ApiConfig,
    #[serde(default)]
    ui: UiConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Root of the backend, e.g. `http://localhost:8080/`. Entity paths such
    /// as `api/rooms` are resolved against it.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Prefix of the backend's alert headers (`X-<name>-alert`).
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
    /// chrono format string for timestamps in lists and detail views.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            items_per_page: default_items_per_page(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// Default `EnvFilter` directives when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            directory: default_log_directory(),
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub bearer_token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_application_name() -> String {
    "partywaveApp".to_string()
}

fn default_items_per_page() -> u32 {
    20
}

fn default_date_format() -> String {
    "%d/%m/%y %H:%M".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filter() -> String {
    "partywave=info,warn".to_string()
}

impl Config {
    /// Config pointing at `base_url` with every other setting at its default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Config {
            api: ApiConfig {
                base_url: base_url.into(),
                timeout_secs: default_timeout_secs(),
                application_name: default_application_name(),
            },
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/admin.toml` and (optionally)
/// `config/credentials.toml`, relative to `base_dir`.
///
/// Does not copy defaults and ignores environment overrides; prefer
/// `load_config()` for normal startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let admin_path = config_dir.join("admin.toml");
    let admin_text = read_file(&admin_path)?;
    let admin: AdminFile = toml::from_str(&admin_text).map_err(|e| ConfigError::ParseError {
        path: admin_path.clone(),
        source: e,
    })?;

    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        api: admin.api,
        ui: admin.ui,
        logging: admin.logging,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were written. Skips `.example` files.
///
/// When `defaults/` is absent and `config/admin.toml` does not exist either,
/// the embedded default admin.toml is written instead.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    if !defaults_dir.exists() {
        let target = config_dir.join("admin.toml");
        if write_new(&target, EMBEDDED_ADMIN_TOML.as_bytes())? {
            copied.push(target);
        }
        return Ok(copied);
    }

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let target = config_dir.join(file_name);
        if write_new(&target, &content)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Pick the directory config is loaded from: the working directory when it
/// carries `config/` or `defaults/`, otherwise the per-user config directory.
pub fn resolve_base_dir() -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return Ok(cwd);
    }
    match directories::ProjectDirs::from("io", "partywave", "partywave-admin") {
        Some(dirs) => Ok(dirs.config_dir().to_path_buf()),
        None => Ok(cwd),
    }
}

/// Convenience wrapper: resolves the base directory, copies defaults, loads
/// the files, and applies environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = resolve_base_dir()?;
    ensure_config_files(&base_dir)?;
    let mut config = load_config_from(&base_dir)?;
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api.base_url = url.trim().to_string();
            validate(&config)?;
        }
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Write `content` to `target` unless it already exists. Returns whether the
/// file was written.
fn write_new(target: &Path, content: &[u8]) -> Result<bool, ConfigError> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(&config.api.base_url).map_err(|e| {
        ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("not a valid URL ({e}): {}", config.api.base_url),
        }
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("scheme must be http or https, got {}", url.scheme()),
        });
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.api.application_name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.application_name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.ui.items_per_page == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.items_per_page".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("partywave_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    #[test]
    fn embedded_defaults_parse_and_validate() {
        let tmp = std::env::temp_dir().join("partywave_config_embedded");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let copied = ensure_config_files(&tmp).expect("should write embedded admin.toml");
        assert_eq!(copied, vec![tmp.join("config").join("admin.toml")]);

        let config = load_config_from(&tmp).expect("embedded defaults should load");
        assert_eq!(config.api.base_url, "http://localhost:8080/");
        assert_eq!(config.api.application_name, "partywaveApp");
        assert_eq!(config.ui.items_per_page, 20);
        assert!(config.credentials.bearer_token.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_does_not_overwrite() {
        let tmp = scratch_dir("no_overwrite");
        fs::write(
            tmp.join("config/admin.toml"),
            "[api]\nbase_url = \"http://example.test/\"\n",
        )
        .unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.api.base_url, "http://example.test/");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn copies_from_defaults_dir_and_skips_examples() {
        let tmp = scratch_dir("defaults_dir");
        let defaults = tmp.join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join("admin.toml"), EMBEDDED_ADMIN_TOML).unwrap();
        fs::write(defaults.join("credentials.toml.example"), "bearer_token = \"x\"\n").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied.len(), 1);
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn loads_credentials_when_present() {
        let tmp = scratch_dir("with_creds");
        fs::write(tmp.join("config/admin.toml"), EMBEDDED_ADMIN_TOML).unwrap();
        fs::write(
            tmp.join("config/credentials.toml"),
            "bearer_token = \"secret-token\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.credentials.bearer_token.as_deref(), Some("secret-token"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_admin_toml_is_file_not_found() {
        let tmp = scratch_dir("missing");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let tmp = scratch_dir("ftp_url");
        fs::write(
            tmp.join("config/admin.toml"),
            "[api]\nbase_url = \"ftp://example.test/\"\n",
        )
        .unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "api.base_url"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_items_per_page() {
        let tmp = scratch_dir("zero_page");
        fs::write(
            tmp.join("config/admin.toml"),
            "[api]\nbase_url = \"http://localhost:8080/\"\n\n[ui]\nitems_per_page = 0\n",
        )
        .unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "ui.items_per_page"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let tmp = scratch_dir("malformed");
        fs::write(tmp.join("config/admin.toml"), "[api\nbase_url = ").unwrap();
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
