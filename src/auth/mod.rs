// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Email Token Gate
//!
//! Creating a wallet needs a token proving control of an email address.
//! Every other wallet operation is authenticated by signature alone.
//!
//! ## Flow
//!
//! 1. Client calls `request_code` with an email address
//! 2. Server issues a token and hands it to the [`TokenMailer`], normally
//!    an external sender program ([`CommandMailer`])
//! 3. Client calls `create_wallet` with the token
//! 4. Server checks the token and binds the wallet to the email fingerprint
//!
//! A fingerprint can own at most one wallet.

pub mod email;
pub mod error;
pub mod mailer;
pub mod token;

pub use email::email_fingerprint;
pub use error::TokenError;
pub use mailer::{CommandMailer, LogMailer, TokenMailer};
pub use token::TimeTokenGate;

use crate::models::EmailFingerprint;

/// Issues and checks email tokens.
pub trait AuthGate: Send + Sync {
    fn issue_token(&self, email: &str) -> Result<String, TokenError>;

    /// Returns the fingerprint of the email the token was issued for.
    fn check_token(&self, token: &str) -> Result<EmailFingerprint, TokenError>;
}
