//! Credential and endpoint resolution.
//!
//! The API key comes from, in order: an explicit argument, the
//! `SEER_API_KEY` environment variable, then the `apikey` entry of
//! `~/.seerapi` (a `key=value` properties file). The base URL follows the
//! same chain with `SEER_API_BASE_URL` and the `url` entry, falling back to
//! [`DEFAULT_BASE_URL`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{SeerClient, DEFAULT_BASE_URL};

pub const API_KEY_ENV: &str = "SEER_API_KEY";
pub const BASE_URL_ENV: &str = "SEER_API_BASE_URL";
pub const PROPERTIES_FILE: &str = ".seerapi";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key: pass one explicitly, set SEER_API_KEY, or add `apikey` to ~/.seerapi")]
    MissingApiKey,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ClientConfig {
    /// Resolve against the process environment and the user's home directory.
    pub fn resolve(explicit_key: Option<&str>) -> Result<Self, ConfigError> {
        let home = dirs::home_dir();
        Self::resolve_with(explicit_key, |name| std::env::var(name).ok(), home.as_deref())
    }

    /// Resolve with an injected environment lookup and home directory.
    pub fn resolve_with<E>(explicit_key: Option<&str>, env: E, home: Option<&Path>) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let known_key = explicit_key.map(str::to_string).or_else(|| non_empty(env(API_KEY_ENV)));

        // the file is only required when it is the last source for the key
        let props = match home {
            Some(dir) => match read_properties(&dir.join(PROPERTIES_FILE)) {
                Ok(props) => props,
                Err(err) if known_key.is_some() => {
                    warn!(error = %err, "ignoring unreadable properties file");
                    HashMap::new()
                }
                Err(err) => return Err(err),
            },
            None => HashMap::new(),
        };

        let api_key = known_key
            .or_else(|| non_empty(props.get("apikey").cloned()))
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = non_empty(env(BASE_URL_ENV))
            .or_else(|| non_empty(props.get("url").cloned()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        debug!(%base_url, "resolved client configuration");
        Ok(Self { base_url, api_key })
    }

    pub fn client(&self) -> SeerClient {
        SeerClient::new(&self.base_url, &self.api_key)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// A missing file is an empty property set.
fn read_properties(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_properties(&text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `key=value` or `key: value` lines; `#` and `!` start comments.
fn parse_properties(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let idx = line.find(['=', ':'])?;
            let (key, value) = line.split_at(idx);
            Some((key.trim().to_string(), value[1..].trim().to_string()))
        })
        .collect()
}
