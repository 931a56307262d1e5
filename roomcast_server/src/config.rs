//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration. Every field has a default and an env override.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address to bind (`ROOMCAST_ADDR`).
    pub bind_addr: String,
    /// Directory receiving uploaded files (`ROOMCAST_UPLOAD_DIR`).
    pub upload_dir: PathBuf,
    /// Directory served under `/static` (`ROOMCAST_STATIC_DIR`).
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("ROOMCAST_ADDR").unwrap_or(defaults.bind_addr),
            upload_dir: env::var("ROOMCAST_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            static_dir: env::var("ROOMCAST_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }
}
