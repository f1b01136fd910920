//! Runtime configuration.
//!
//! Defaults reproduce the fixed deployment: store at `/var/www/data/users.db`,
//! entry page `index.html`, listening on port 8080. Any field can be
//! overridden with a `LOGIN_`-prefixed environment variable, e.g.
//! `LOGIN_DATABASE_PATH=./data/users.db`.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::LoginError;

pub const ENV_PREFIX: &str = "LOGIN_";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    /// Location of the single-file SQLite store.
    pub database_path: PathBuf,
    /// Static login form the endpoint redirects and links back to.
    pub entry_page: String,
    /// Log filter used when `RUST_LOG` is not set.
    pub loglevel: String,
    /// Create missing store directories as `0777` instead of `0755`.
    pub world_writable_dirs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            database_path: PathBuf::from("/var/www/data/users.db"),
            entry_page: "index.html".to_string(),
            loglevel: "info".to_string(),
            world_writable_dirs: false,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, LoginError> {
        Ok(Self::figment().extract()?)
    }

    /// Permission bits for directories created by the store initializer.
    pub fn dir_mode(&self) -> u32 {
        if self.world_writable_dirs { 0o777 } else { 0o755 }
    }
}
