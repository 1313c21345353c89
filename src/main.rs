// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use wallet_sync_server::{
    api::router,
    auth::{CommandMailer, LogMailer, TimeTokenGate, TokenMailer},
    config::ServerConfig,
    init_tracing,
    rate_limit::RateLimiter,
    state::AppState,
    storage::WalletDatabase,
    wallet::WalletStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);
    tracing::info!(?config, "Configuration loaded");

    let db = WalletDatabase::open_in(&config.data_dir)?;
    let wallets = WalletStore::new(Arc::new(db), config.address_prefix.clone());

    let secret = match config.token_secret.clone() {
        Some(secret) => secret,
        None => {
            tracing::warn!(
                "AUTH_TOKEN_SECRET not set; email tokens will not survive a restart"
            );
            rand::random::<[u8; 32]>().to_vec()
        }
    };
    let auth_gate = TimeTokenGate::new(secret, config.token_ttl);

    let mailer: Arc<dyn TokenMailer> = match config
        .token_mailer_command
        .as_deref()
        .and_then(CommandMailer::from_command_line)
    {
        Some(mailer) => Arc::new(mailer),
        None => {
            tracing::warn!("TOKEN_MAILER_COMMAND not set; email tokens will not be delivered");
            Arc::new(LogMailer)
        }
    };

    if config.rate_limit_per_hour == 0 {
        tracing::warn!("Rate limiting disabled");
    }
    let state = AppState::new(
        wallets,
        Arc::new(auth_gate),
        mailer,
        RateLimiter::per_hour(config.rate_limit_per_hour),
    );
    let app = router(state);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Wallet sync server listening (docs at /docs)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
