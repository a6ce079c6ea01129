//! Credential loading from `.env` files and the process environment.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::providers::openrouter::API_KEY_ENV;

/// Keys picked up from the process environment.
const KNOWN_KEYS: &[&str] = &[API_KEY_ENV];

/// Runtime credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a credential value for a key, if present and non-blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// The OpenRouter API key, if configured.
    pub fn openrouter_api_key(&self) -> Option<String> {
        self.get(API_KEY_ENV).map(str::to_owned)
    }
}

/// Read every entry of an explicit `--env-file`.
///
/// Non-key entries are kept too, so the file can also carry endpoint and
/// site overrides. The file must not be readable by group or others.
///
/// # Errors
///
/// Returns an error if the file is missing, too widely readable, or
/// malformed.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        anyhow::bail!("env file {} does not exist", path.display());
    }

    validate_private_permissions(path)?;

    let vars = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read env file {}", path.display()))?
        .collect::<Result<BTreeMap<_, _>, _>>()
        .with_context(|| format!("malformed entry in env file {}", path.display()))?;

    Ok(Credentials { vars })
}

/// Fold a `.env` file from the working directory into the process
/// environment. Variables that are already set keep their values.
///
/// Call once at startup, before anything reads the environment. Returns
/// the file that was loaded; an unreadable file is skipped.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            debug!(error = %e, "ignoring unreadable .env file");
            None
        }
    }
}

/// Collect the known provider keys from the process environment.
pub fn load_env_credentials() -> Credentials {
    let vars = KNOWN_KEYS
        .iter()
        .filter_map(|key| std::env::var(key).ok().map(|v| ((*key).to_owned(), v)))
        .collect();
    Credentials { vars }
}

#[cfg(unix)]
fn validate_private_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to stat env file {}", path.display()))?;
    let mode = metadata.permissions().mode() & 0o777;

    if mode & 0o077 != 0 {
        anyhow::bail!("env file {} must be 0600, found {mode:o}", path.display());
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_private_permissions(path: &Path) -> anyhow::Result<()> {
    fs::metadata(path)
        .with_context(|| format!("failed to stat env file {}", path.display()))?;
    Ok(())
}
