//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*`
//! env vars into a typed `AppConfig`. Provides helpers to expand `~` and
//! `${VAR}` and to resolve relative paths against a known base directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base directory holding every persisted store.
    pub data_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Dimension of the embedding collaborator's vectors.
    pub embedding_dim: usize,
    /// Reference fusion policy; no documented derivation, treat as
    /// defaults rather than fixed law.
    pub lexical_weight: f32,
    pub vector_weight: f32,
    pub overfetch_factor: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.kmsdb".to_string(),
            chunk_size: 500,
            chunk_overlap: 50,
            embedding_dim: 384,
            lexical_weight: 0.6,
            vector_weight: 0.4,
            overfetch_factor: 2,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        let config: AppConfig =
            figment.extract().map_err(|err| Error::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidChunking {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        if self.embedding_dim == 0 {
            return Err(Error::invalid_config("embedding_dim must be positive"));
        }
        if self.lexical_weight < 0.0 || self.vector_weight < 0.0 {
            return Err(Error::invalid_config("fusion weights must be non-negative"));
        }
        if self.overfetch_factor == 0 {
            return Err(Error::invalid_config("overfetch_factor must be positive"));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    pub fn lexical_index_dir(&self) -> PathBuf {
        self.data_dir().join("lexical")
    }

    pub fn vector_index_path(&self) -> PathBuf {
        self.data_dir().join("vectors.bin")
    }

    pub fn metadata_store_path(&self) -> PathBuf {
        self.data_dir().join("metadata.json")
    }

    /// Ensure the directories required by the stores exist.
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after
/// expansion. If `p` is absolute, it's returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_reference_policy() {
        let config = AppConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert!((config.lexical_weight - 0.6).abs() < f32::EPSILON);
        assert!((config.vector_weight - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.overfetch_factor, 2);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn validate_rejects_degenerate_chunking() {
        let config = AppConfig { chunk_size: 100, chunk_overlap: 100, ..AppConfig::default() };
        assert!(matches!(config.validate().unwrap_err(), Error::InvalidChunking { .. }));
    }

    #[test]
    fn store_paths_hang_off_the_data_dir() {
        let config = AppConfig { data_dir: "/tmp/kb".to_string(), ..AppConfig::default() };
        assert_eq!(config.lexical_index_dir(), PathBuf::from("/tmp/kb/lexical"));
        assert_eq!(config.vector_index_path(), PathBuf::from("/tmp/kb/vectors.bin"));
        assert_eq!(config.metadata_store_path(), PathBuf::from("/tmp/kb/metadata.json"));
    }
}
