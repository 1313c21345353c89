// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Sync Server - Encrypted Wallet Backup Service
//!
//! Stores one opaque encrypted wallet blob per secp256k1 key. The key never
//! leaves the client: every mutating request carries a recoverable signature
//! and the server derives the owner from it.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Email tokens gating wallet creation
//! - `ecc` - Key encoding, addresses and recoverable signatures
//! - `storage` - Embedded wallet database (redb)
//! - `wallet` - Authenticated wallet state machine

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, DEFAULT_LOG_FILTER};

pub mod api;
pub mod auth;
pub mod config;
pub mod ecc;
pub mod encoding;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod storage;
pub mod wallet;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
