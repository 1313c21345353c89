// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding `wallets.redb` | `./data` |
//! | `ADDRESS_PREFIX` | Public key string prefix | `GPH` |
//! | `AUTH_TOKEN_SECRET` | HMAC secret for email tokens | Random per process |
//! | `AUTH_TOKEN_TTL_SECS` | Email token lifetime, at most 30 days | `3600` |
//! | `TOKEN_MAILER_COMMAND` | Sender program (+ args) run per email token | Tokens not delivered |
//! | `RATE_LIMIT_PER_HOUR` | Requests per client IP per hour (`0` disables) | `100` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The wallet database file `wallets.redb` is created inside it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const ADDRESS_PREFIX_ENV: &str = "ADDRESS_PREFIX";

/// HMAC secret for email tokens.
///
/// Tokens only survive a restart (or work across replicas) when this is set.
pub const AUTH_TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

pub const AUTH_TOKEN_TTL_ENV: &str = "AUTH_TOKEN_TTL_SECS";

/// External program that delivers email tokens.
///
/// Invoked as `<command...> <email>` with the token on stdin. Exit status 0
/// means delivered.
pub const TOKEN_MAILER_COMMAND_ENV: &str = "TOKEN_MAILER_COMMAND";

pub const RATE_LIMIT_ENV: &str = "RATE_LIMIT_PER_HOUR";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_ADDRESS_PREFIX: &str = "GPH";
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;
pub const DEFAULT_RATE_LIMIT_PER_HOUR: u32 = 100;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {name}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Server settings resolved from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub address_prefix: String,
    /// `None` means a random secret is generated at startup.
    pub token_secret: Option<Vec<u8>>,
    pub token_ttl: Duration,
    /// `None` leaves tokens undelivered (development only).
    pub token_mailer_command: Option<String>,
    /// `0` disables rate limiting.
    pub rate_limit_per_hour: u32,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("data_dir", &self.data_dir)
            .field("address_prefix", &self.address_prefix)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl", &self.token_ttl)
            .field("token_mailer_command", &self.token_mailer_command)
            .field("rate_limit_per_hour", &self.rate_limit_per_hour)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host: IpAddr = parse_or(&get, HOST_ENV, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = parse_or(&get, PORT_ENV, DEFAULT_PORT)?;

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        let token_ttl_secs: i64 = parse_or(&get, AUTH_TOKEN_TTL_ENV, DEFAULT_TOKEN_TTL_SECS)?;
        let token_ttl = Some(token_ttl_secs)
            .filter(|secs| (1..=MAX_TOKEN_TTL_SECS).contains(secs))
            .and_then(Duration::try_seconds)
            .ok_or_else(|| ConfigError {
                name: AUTH_TOKEN_TTL_ENV,
                value: token_ttl_secs.to_string(),
            })?;

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            data_dir: get(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            address_prefix: get(ADDRESS_PREFIX_ENV)
                .unwrap_or_else(|| DEFAULT_ADDRESS_PREFIX.to_string()),
            token_secret: get(AUTH_TOKEN_SECRET_ENV).map(String::into_bytes),
            token_ttl,
            token_mailer_command: get(TOKEN_MAILER_COMMAND_ENV).map(|line| line.trim().to_string()),
            rate_limit_per_hour: parse_or(&get, RATE_LIMIT_ENV, DEFAULT_RATE_LIMIT_PER_HOUR)?,
            log_format,
        })
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError { name, value }),
        None => Ok(default),
    }
}
