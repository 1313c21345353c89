// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-client request limiting.
//!
//! Each client IP gets a fixed window. The window table is an LRU so a flood
//! of distinct addresses evicts the oldest windows instead of growing memory.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lru::LruCache;

use crate::error::ApiError;
use crate::state::AppState;

/// Number of client windows kept in memory.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// One client's current window.
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by client IP.
pub struct RateLimiter {
    windows: Mutex<LruCache<IpAddr, Window>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    /// `limit` requests per `window`; `limit = 0` admits everything.
    pub fn new(limit: u32, window: Duration, capacity: usize) -> Self {
        Self {
            windows: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            limit,
            window,
        }
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(3600), DEFAULT_CAPACITY)
    }

    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    /// Count one request from `ip`; `false` once the window is exhausted.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        if !self.is_enabled() {
            return true;
        }
        // Poisoned lock: admit.
        let Ok(mut windows) = self.windows.lock() else {
            return true;
        };

        if let Some(window) = windows.get_mut(&ip) {
            if now.duration_since(window.started_at) < self.window {
                if window.count >= self.limit {
                    return false;
                }
                window.count += 1;
                return true;
            }
        }

        windows.put(
            ip,
            Window {
                started_at: now,
                count: 1,
            },
        );
        true
    }
}

/// Middleware rejecting clients over their limit with 429.
///
/// Requests without peer information (no `ConnectInfo`) are not limited.
pub async fn limit_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(ip) = peer {
        if !state.limiter.check(ip) {
            tracing::warn!(client = %ip, "Rate limit exceeded");
            return ApiError::too_many_requests("too many requests, try again later")
                .into_response();
        }
    }

    next.run(request).await
}
