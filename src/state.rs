// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthGate, TokenMailer};
use crate::rate_limit::RateLimiter;
use crate::wallet::WalletStore;

#[derive(Clone)]
pub struct AppState {
    pub wallets: WalletStore,
    pub auth_gate: Arc<dyn AuthGate>,
    pub mailer: Arc<dyn TokenMailer>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        wallets: WalletStore,
        auth_gate: Arc<dyn AuthGate>,
        mailer: Arc<dyn TokenMailer>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            wallets,
            auth_gate,
            mailer,
            limiter: Arc::new(limiter),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::auth::{TimeTokenGate, TokenError};
    use crate::storage::WalletDatabase;

    pub const PREFIX: &str = "GPH";

    /// Keeps every `(email, token)` it is handed.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TokenMailer for RecordingMailer {
        async fn deliver(&self, email: &str, token: &str) -> Result<(), TokenError> {
            self.sent
                .lock()
                .unwrap()
                .push((email.to_string(), token.to_string()));
            Ok(())
        }
    }

    /// State over a throwaway database, with rate limiting off.
    pub fn test_state() -> (AppState, tempfile::TempDir) {
        let (state, _, dir) = test_state_with_mailer();
        (state, dir)
    }

    pub fn test_state_with_mailer() -> (AppState, Arc<RecordingMailer>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = WalletDatabase::open_in(dir.path()).unwrap();
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(
            WalletStore::new(Arc::new(db), PREFIX),
            Arc::new(TimeTokenGate::new(
                b"test-secret".to_vec(),
                chrono::Duration::hours(1),
            )),
            mailer.clone(),
            RateLimiter::per_hour(0),
        );
        (state, mailer, dir)
    }
}
