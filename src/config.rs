// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! typed [`AppConfig`] loaded from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET_KEY` | HMAC secret used to sign bearer tokens | Required |
//! | `ACCESS_TOKEN_EXPIRE_MINUTES` | Token lifetime in minutes (max one year) | `30` |
//! | `CORS_ALLOWED_ORIGINS` | Comma-separated allowed origins | Any origin |
//! | `DATA_DIR` | Directory holding `users.redb` | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `SEED_DEMO_USERS` | Seed the demo accounts on startup | `false` |
//! | `LOG_FORMAT` | Logging format (`json`, `pretty` or `compact`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::auth::DEFAULT_TOKEN_TTL_MINUTES;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";
pub const TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";
pub const CORS_ORIGINS_ENV: &str = "CORS_ALLOWED_ORIGINS";

/// Environment variable name for the data directory path.
///
/// The credential database is created as `users.redb` inside it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_DEMO_USERS_ENV: &str = "SEED_DEMO_USERS";

/// Upper bound for `ACCESS_TOKEN_EXPIRE_MINUTES` (one year).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// File name of the credential database inside the data directory.
pub const USER_DB_FILE: &str = "users.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub seed_demo_users: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("cors_origins", &self.cors_origins)
            .field("data_dir", &self.data_dir)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("seed_demo_users", &self.seed_demo_users)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let token_ttl_minutes = match get(TOKEN_TTL_ENV) {
            Some(raw) => {
                let minutes: i64 = raw.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: TOKEN_TTL_ENV,
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes) {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_ENV,
                        value: raw,
                        reason: format!("must be between 1 and {MAX_TOKEN_TTL_MINUTES} minutes"),
                    });
                }
                minutes
            }
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };

        let cors_origins = get(CORS_ORIGINS_ENV)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let seed_demo_users = match get(SEED_DEMO_USERS_ENV) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                name: SEED_DEMO_USERS_ENV,
                value: raw.clone(),
                reason: "expected true/false".to_string(),
            })?,
            None => false,
        };

        Ok(Self {
            jwt_secret,
            token_ttl_minutes,
            cors_origins,
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            seed_demo_users,
        })
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.data_dir.join(USER_DB_FILE)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: HOST_ENV,
            value: raw.clone(),
            reason: e.to_string(),
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
