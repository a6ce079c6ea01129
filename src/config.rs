//! Configuration loading and validation.
//!
//! Wren reads an optional `config.toml` (explicit path, else
//! `~/.wren/config.toml`, else built-in defaults) and then applies the
//! environment overrides the hosting platform supplies. Everything here is
//! resolved once at process start; the routing core only ever sees the
//! finished values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::agent::TaskCategory;

/// Environment variable overriding the provider endpoint.
pub const ENDPOINT_ENV: &str = "OPENROUTER_API_URL";
/// Environment variable overriding the `HTTP-Referer` header.
pub const SITE_URL_ENV: &str = "SITE_URL";
/// Environment variable overriding the `X-Title` header.
pub const SITE_NAME_ENV: &str = "SITE_NAME";
/// Environment variable overriding the liveness port.
pub const PORT_ENV: &str = "PORT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Completion provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Conversation memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Liveness endpoint settings.
    #[serde(default)]
    pub health: HealthConfig,

    /// Persona template settings.
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Per-category backend model overrides.
    #[serde(default)]
    pub models: BTreeMap<TaskCategory, String>,
}

/// Completion provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Chat-completions endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Value for the `HTTP-Referer` header.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Value for the `X-Title` header.
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            site_url: default_site_url(),
            site_name: default_site_name(),
        }
    }
}

/// Conversation memory settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Maximum turns retained per user.
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
        }
    }
}

/// Liveness endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// TCP port for the liveness listener.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Persona template settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaConfig {
    /// Replacement persona template file. The built-in template is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// Default value functions for serde

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_owned()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_site_url() -> String {
    "https://discord-ai-bot.com".to_owned()
}
fn default_site_name() -> String {
    "Wren Ford Assistant".to_owned()
}
fn default_window() -> usize {
    10
}
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.provider.endpoint = endpoint;
        }
        if let Some(site_url) = lookup(SITE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.provider.site_url = site_url;
        }
        if let Some(site_name) = lookup(SITE_NAME_ENV).filter(|v| !v.trim().is_empty()) {
            self.provider.site_name = site_name;
        }
        if let Some(port) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
            self.health.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a port number, got {port:?}"))?;
        }
        Ok(())
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL, the
    /// memory window is zero, or the provider timeout is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        let endpoint = url::Url::parse(&self.provider.endpoint)
            .with_context(|| format!("invalid provider endpoint {:?}", self.provider.endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!(
                "provider endpoint must use http or https, got {:?}",
                endpoint.scheme()
            );
        }
        if self.memory.window == 0 {
            anyhow::bail!("memory.window must be at least 1");
        }
        if self.provider.timeout_secs == 0 {
            anyhow::bail!("provider.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    Ok(config)
}

/// Resolve the effective configuration from the process environment.
///
/// Precedence: environment > file > defaults. The file is `explicit` when
/// given, else `~/.wren/config.toml` when it exists.
///
/// # Errors
///
/// Returns an error if a present file is invalid, an override is malformed,
/// or validation fails.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    resolve_config_with(explicit, |key| std::env::var(key).ok())
}

/// Like [`resolve_config`], but overrides come from `lookup`.
///
/// # Errors
///
/// Same as [`resolve_config`].
pub fn resolve_config_with<F>(explicit: Option<&Path>, lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None => match config_dir().map(|dir| dir.join("config.toml")) {
            Ok(path) if path.exists() => load_config(&path)?,
            _ => Config::default(),
        },
    };
    config.apply_env_overrides(lookup)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the default config directory (`~/.wren/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".wren"))
}
