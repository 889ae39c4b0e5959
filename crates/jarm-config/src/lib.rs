//! Shared configuration for the JARM CLI and TUI.
//!
//! TOML profiles with global defaults, `JARM_`-prefixed environment
//! overrides, and translation to `jarm_core::DashboardConfig`. Both
//! binaries depend on this crate; the CLI layers its flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use jarm_core::{DashboardConfig, RefreshIntervals, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("no backend configured (pass --server or add a profile)")]
    NoServer,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll period of every stream, in milliseconds.
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,

    #[serde(default = "default_chart_refresh_ms")]
    pub chart_refresh_ms: u64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_true")]
    pub audio: bool,

    /// Use the push channel when available.
    #[serde(default = "default_true")]
    pub push: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            refresh_ms: default_refresh_ms(),
            chart_refresh_ms: default_chart_refresh_ms(),
            page_size: default_page_size(),
            audio: true,
            push: true,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    15
}
fn default_refresh_ms() -> u64 {
    2000
}
fn default_chart_refresh_ms() -> u64 {
    5000
}
fn default_page_size() -> usize {
    5
}
fn default_true() -> bool {
    true
}

/// A named backend profile. Unset fields fall back to [`Defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g. "http://127.0.0.1:5000").
    pub server: String,

    /// Push channel URL. Derived from `server` when unset.
    pub push_url: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,
    pub timeout: Option<u64>,
    pub refresh_ms: Option<u64>,
    pub chart_refresh_ms: Option<u64>,
    pub page_size: Option<usize>,
    pub audio: Option<bool>,
    pub push: Option<bool>,
}

impl Profile {
    pub fn for_server(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "jarm", "jarm").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("jarm");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Nested keys use a double underscore: `JARM_DEFAULTS__TIMEOUT=30`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("JARM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the named profile, else the configured default.
pub fn resolve_profile<'a>(
    cfg: &'a Config,
    name: Option<&str>,
) -> Result<(String, &'a Profile), ConfigError> {
    let name = name
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    cfg.profiles
        .get(&name)
        .map(|profile| (name.clone(), profile))
        .ok_or(ConfigError::UnknownProfile { name })
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" | "ws" | "wss" => Ok(url),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Build a `DashboardConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    if profile.server.trim().is_empty() {
        return Err(ConfigError::NoServer);
    }
    let url = parse_url("server", profile.server.trim())?;
    let push_url = profile
        .push_url
        .as_deref()
        .map(|raw| parse_url("push_url", raw))
        .transpose()?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let refresh_ms = profile.refresh_ms.unwrap_or(defaults.refresh_ms);
    if refresh_ms == 0 {
        return Err(ConfigError::Validation {
            field: "refresh_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }

    let mut config = DashboardConfig::new(url);
    config.push_url = push_url;
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh = RefreshIntervals::uniform(Duration::from_millis(refresh_ms));
    config.chart_refresh = Duration::from_millis(
        profile
            .chart_refresh_ms
            .unwrap_or(defaults.chart_refresh_ms)
            .max(1),
    );
    config.page_size = profile.page_size.unwrap_or(defaults.page_size).max(1);
    config.audio_enabled = profile.audio.unwrap_or(defaults.audio);
    config.push_enabled = profile.push.unwrap_or(defaults.push);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.refresh_ms = 3000;
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                page_size: Some(10),
                ..Profile::for_server("http://10.0.0.5:5000")
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.refresh_ms, 3000);
        assert_eq!(loaded.profiles["lab"].page_size, Some(10));
        assert_eq!(loaded.profiles["lab"].server, "http://10.0.0.5:5000");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.defaults, Defaults::default());
        assert_eq!(loaded.default_profile.as_deref(), Some("default"));
    }

    #[test]
    fn profile_overrides_defaults() {
        let defaults = Defaults::default();
        let profile = Profile {
            refresh_ms: Some(500),
            audio: Some(false),
            insecure: Some(true),
            ..Profile::for_server("https://jarm.example:8443")
        };
        let config = profile_to_dashboard_config(&profile, &defaults).unwrap();

        assert_eq!(config.refresh.alerts, Duration::from_millis(500));
        assert_eq!(config.chart_refresh, Duration::from_millis(5000));
        assert_eq!(config.page_size, 5);
        assert!(!config.audio_enabled);
        assert!(config.push_enabled);
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(
            config.push_endpoint().unwrap().as_str(),
            "wss://jarm.example:8443/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn invalid_server_is_rejected() {
        let defaults = Defaults::default();
        let err = profile_to_dashboard_config(&Profile::for_server("not a url"), &defaults)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));

        let err = profile_to_dashboard_config(&Profile::for_server("ftp://host"), &defaults)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));

        let err =
            profile_to_dashboard_config(&Profile::for_server(""), &defaults).unwrap_err();
        assert!(matches!(err, ConfigError::NoServer));
    }

    #[test]
    fn resolves_default_profile() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::for_server("http://127.0.0.1:5000"));

        let (name, profile) = resolve_profile(&cfg, None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.server, "http://127.0.0.1:5000");

        assert!(matches!(
            resolve_profile(&cfg, Some("prod")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }
}
