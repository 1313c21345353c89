// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Out-of-band token delivery.
//!
//! Production delivery runs an external sender program per token:
//!
//! ```text
//! <program> [args...] <email>      token on stdin, exit 0 = delivered
//! ```

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::error::TokenError;

/// How long a sender program may run before delivery counts as failed.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Hands an issued token to its recipient.
#[async_trait]
pub trait TokenMailer: Send + Sync {
    async fn deliver(&self, email: &str, token: &str) -> Result<(), TokenError>;
}

/// Delivers tokens through an external sender program.
///
/// The token travels on stdin, never in argv.
#[derive(Debug, Clone)]
pub struct CommandMailer {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandMailer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Parse a whitespace-separated command line. `None` if it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let mut mailer = Self::new(parts.next()?);
        mailer.args = parts.map(str::to_string).collect();
        Some(mailer)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, email: &str, token: &str) -> Result<(), TokenError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(email)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TokenError::Delivery(format!("{}: {e}", self.program.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(token.as_bytes())
                .await
                .map_err(|e| TokenError::Delivery(format!("writing token: {e}")))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| TokenError::Delivery(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(TokenError::Delivery(format!("sender exited with {status}")))
        }
    }
}

#[async_trait]
impl TokenMailer for CommandMailer {
    async fn deliver(&self, email: &str, token: &str) -> Result<(), TokenError> {
        match tokio::time::timeout(self.timeout, self.run(email, token)).await {
            Ok(result) => result,
            Err(_) => Err(TokenError::Delivery(format!(
                "sender timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

/// Development sink: records that a token was issued, without the token.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl TokenMailer for LogMailer {
    async fn deliver(&self, email: &str, _token: &str) -> Result<(), TokenError> {
        tracing::info!(
            target: "wallet_sync_server::mailer",
            to = %email,
            token = "<withheld>",
            "Email token issued but not delivered"
        );
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> CommandMailer {
        CommandMailer::new("/bin/sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn sender_receives_email_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sent");
        // `sh -c script name` binds the trailing email to $0.
        let mailer = shell(&format!(r#"printf '%s ' "$0" > "{0}"; cat >> "{0}""#, out.display()));

        mailer
            .deliver("alice@example.com", "TOKEN123")
            .await
            .unwrap();

        let sent = std::fs::read_to_string(&out).unwrap();
        assert_eq!(sent, "alice@example.com TOKEN123");
    }

    #[tokio::test]
    async fn failing_sender_is_a_delivery_error() {
        let err = shell("exit 3")
            .deliver("alice@example.com", "TOKEN123")
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Delivery(_)));
    }

    #[tokio::test]
    async fn missing_program_is_a_delivery_error() {
        let err = CommandMailer::new("/nonexistent/send-token")
            .deliver("alice@example.com", "TOKEN123")
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Delivery(_)));
    }

    #[tokio::test]
    async fn slow_sender_times_out() {
        let err = shell("sleep 5")
            .with_timeout(Duration::from_millis(100))
            .deliver("alice@example.com", "TOKEN123")
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Delivery(ref reason) if reason.contains("timed out")));
    }

    #[test]
    fn command_line_splits_program_and_args() {
        let mailer = CommandMailer::from_command_line(" /usr/bin/send-token --from noreply ").unwrap();
        assert_eq!(mailer.program, PathBuf::from("/usr/bin/send-token"));
        assert_eq!(mailer.args, vec!["--from", "noreply"]);
        assert!(CommandMailer::from_command_line("   ").is_none());
    }
}
