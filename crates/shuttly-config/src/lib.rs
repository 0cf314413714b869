//! Shared configuration for the Shuttly CLI.
//!
//! TOML profiles, figment loading (defaults → file → `SHUTTLY_` env),
//! and durable bearer-token storage. The token is the only client
//! state that survives a restart: resolution is env var → system
//! keyring → token file, mirroring how credentials are resolved.

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shuttly_core::{CoreError, TokenStore};

/// Environment variable that short-circuits token resolution.
pub const TOKEN_ENV: &str = "SHUTTLY_TOKEN";

const KEYRING_SERVICE: &str = "shuttly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' -- check `shuttly config show`")]
    UnknownProfile { profile: String },

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

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
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

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
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
    30
}

/// A named server profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Booking server base URL (e.g., "https://book.example.com").
    pub server: String,

    /// Contact email prefill for passenger details.
    pub contact_email: Option<String>,

    /// Contact phone prefill for passenger details.
    pub contact_phone: Option<String>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    /// Parse the profile's server URL.
    pub fn server_url(&self) -> Result<url::Url, ConfigError> {
        self.server.parse().map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", self.server),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "shuttly", "shuttly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// The token-file fallback lives next to the config, one per profile.
pub fn token_path(profile: &str) -> PathBuf {
    config_path().with_file_name(format!("{profile}.token"))
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shuttly");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("SHUTTLY_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick a profile by explicit name, falling back to the configured
/// default, falling back to "default".
pub fn resolve_profile<'c>(
    config: &'c Config,
    name: Option<&str>,
) -> Result<(String, &'c Profile), ConfigError> {
    let name = name
        .map(ToOwned::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    config
        .profiles
        .get(&name)
        .map(|profile| (name.clone(), profile))
        .ok_or(ConfigError::UnknownProfile { profile: name })
}

// ── Durable token storage ───────────────────────────────────────────

/// Bearer-token persistence implementing `shuttly-core`'s `TokenStore`.
///
/// Load order: `SHUTTLY_TOKEN` env var → system keyring → token file.
/// Stores write the keyring first and fall back to the token file when
/// no keyring backend is available; clears remove both.
pub struct DurableTokenStore {
    profile: String,
    file_path: PathBuf,
    keyring_enabled: bool,
}

impl DurableTokenStore {
    /// The store for a named profile, at the platform locations.
    pub fn for_profile(profile: &str) -> Self {
        Self {
            profile: profile.to_owned(),
            file_path: token_path(profile),
            keyring_enabled: true,
        }
    }

    /// A store rooted at an explicit token file, keyring disabled.
    /// Used by tests and sandboxed environments.
    pub fn at_path(profile: &str, file_path: PathBuf) -> Self {
        Self {
            profile: profile.to_owned(),
            file_path,
            keyring_enabled: false,
        }
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        if !self.keyring_enabled {
            return None;
        }
        keyring::Entry::new(KEYRING_SERVICE, &format!("{}/token", self.profile)).ok()
    }
}

impl TokenStore for DurableTokenStore {
    fn load(&self) -> Option<SecretString> {
        // 1. Environment override
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                return Some(SecretString::from(token));
            }
        }

        // 2. System keyring
        if let Some(entry) = self.keyring_entry() {
            if let Ok(token) = entry.get_password() {
                return Some(SecretString::from(token));
            }
        }

        // 3. Token file
        match std::fs::read_to_string(&self.file_path) {
            Ok(token) if !token.trim().is_empty() => {
                Some(SecretString::from(token.trim().to_owned()))
            }
            _ => None,
        }
    }

    fn store(&self, token: &SecretString) -> Result<(), CoreError> {
        if let Some(entry) = self.keyring_entry() {
            if entry.set_password(token.expose_secret()).is_ok() {
                return Ok(());
            }
        }

        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::TokenStorage(e.to_string()))?;
        }
        std::fs::write(&self.file_path, token.expose_secret())
            .map_err(|e| CoreError::TokenStorage(e.to_string()))
    }

    fn clear(&self) -> Result<(), CoreError> {
        if let Some(entry) = self.keyring_entry() {
            // Absent credentials are fine; only real failures matter.
            let _ = entry.delete_credential();
        }
        match std::fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::TokenStorage(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_explicit_name() {
        let mut config = Config::default();
        config.profiles.insert(
            "prod".into(),
            Profile {
                server: "https://book.example.com".into(),
                ..Profile::default()
            },
        );
        let (name, profile) = resolve_profile(&config, Some("prod")).unwrap();
        assert_eq!(name, "prod");
        assert_eq!(profile.server, "https://book.example.com");
    }

    #[test]
    fn resolve_unknown_profile_errors() {
        let config = Config::default();
        assert!(matches!(
            resolve_profile(&config, Some("nope")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn server_url_must_parse() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        assert!(profile.server_url().is_err());
    }

    #[test]
    fn token_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableTokenStore::at_path("default", dir.path().join("default.token"));

        assert!(store.load().is_none());
        store.store(&SecretString::from("tok-123")).unwrap();
        assert_eq!(store.load().unwrap().expose_secret(), "tok-123");

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn clearing_an_absent_token_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableTokenStore::at_path("default", dir.path().join("default.token"));
        store.clear().unwrap();
    }
}
