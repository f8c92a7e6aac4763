//! Secret store
//!
//! Credentials and connection parameters (service URL, API token, bucket
//! names) mounted as one file per secret. Values are opaque strings.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading secrets
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret {name} not found in {dir} or ${env}")]
    Missing {
        name: String,
        dir: PathBuf,
        env: String,
    },

    #[error("Failed to read secret {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Reads named secrets from a directory, falling back to the environment
#[derive(Debug, Clone)]
pub struct SecretStore {
    dir: PathBuf,
}

impl SecretStore {
    /// Where secrets are mounted unless configured otherwise
    pub const DEFAULT_DIR: &'static str = "/app/secrets";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads secret `name`
    ///
    /// Looks for `<dir>/<name>` first; only the first line is used, with
    /// surrounding whitespace and single quotes removed. Falls back to the
    /// `JOBWATCH_SECRET_<NAME>` environment variable.
    pub fn get(&self, name: &str) -> Result<String, SecretError> {
        self.lookup(name, |key| std::env::var(key).ok())
    }

    /// Like `get`, but a missing secret is `None`
    pub fn get_optional(&self, name: &str) -> Result<Option<String>, SecretError> {
        match self.get(name) {
            Ok(value) => Ok(Some(value)),
            Err(SecretError::Missing { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn lookup(
        &self,
        name: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<String, SecretError> {
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(raw) => return Ok(clean(&raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SecretError::Io {
                    name: name.to_string(),
                    source,
                });
            }
        }

        let key = env_key(name);
        env(&key).map(|raw| clean(&raw)).ok_or(SecretError::Missing {
            name: name.to_string(),
            dir: self.dir.clone(),
            env: key,
        })
    }
}

impl Default for SecretStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR)
    }
}

fn env_key(name: &str) -> String {
    let normalized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("JOBWATCH_SECRET_{}", normalized)
}

fn clean(raw: &str) -> String {
    raw.lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('\'')
        .to_string()
}
