// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Self-contained, expiring email tokens.
//!
//! ```text
//! token = base58(fingerprint[32] ‖ expires_at[i64 BE] ‖ HMAC-SHA256(secret, fingerprint ‖ expires_at))
//! ```
//!
//! Nothing is stored server-side: any process holding the secret can check
//! a token until it expires.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::models::EmailFingerprint;

use super::email::email_fingerprint;
use super::error::TokenError;
use super::AuthGate;

type HmacSha256 = Hmac<Sha256>;

const FINGERPRINT_LEN: usize = 32;
const EXPIRY_LEN: usize = 8;
const MAC_LEN: usize = 32;
const TOKEN_LEN: usize = FINGERPRINT_LEN + EXPIRY_LEN + MAC_LEN;

/// HMAC-signed email tokens with a fixed lifetime.
pub struct TimeTokenGate {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TimeTokenGate {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn mac(&self, body: &[u8]) -> Result<HmacSha256, TokenError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .map_err(|e| TokenError::Delivery(e.to_string()))?;
        mac.update(body);
        Ok(mac)
    }

    pub(crate) fn issue_token_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let fingerprint = email_fingerprint(email)?;
        let expires_at = now
            .checked_add_signed(self.ttl)
            .map_or(i64::MAX, |expiry| expiry.timestamp());

        let mut token = Vec::with_capacity(TOKEN_LEN);
        token.extend_from_slice(fingerprint.as_bytes());
        token.extend_from_slice(&expires_at.to_be_bytes());
        let tag = self.mac(&token)?.finalize().into_bytes();
        token.extend_from_slice(&tag);

        Ok(bs58::encode(token).into_string())
    }

    pub(crate) fn check_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<EmailFingerprint, TokenError> {
        let raw = bs58::decode(token.trim())
            .into_vec()
            .map_err(|_| TokenError::Malformed)?;
        if raw.len() != TOKEN_LEN {
            return Err(TokenError::Malformed);
        }

        let (body, tag) = raw.split_at(FINGERPRINT_LEN + EXPIRY_LEN);
        self.mac(body)?
            .verify_slice(tag)
            .map_err(|_| TokenError::BadSignature)?;

        let (fingerprint, expiry) = body.split_at(FINGERPRINT_LEN);
        let mut expiry_bytes = [0u8; EXPIRY_LEN];
        expiry_bytes.copy_from_slice(expiry);
        if now.timestamp() > i64::from_be_bytes(expiry_bytes) {
            return Err(TokenError::Expired);
        }

        EmailFingerprint::from_slice(fingerprint).ok_or(TokenError::Malformed)
    }
}

impl AuthGate for TimeTokenGate {
    fn issue_token(&self, email: &str) -> Result<String, TokenError> {
        self.issue_token_at(email, Utc::now())
    }

    fn check_token(&self, token: &str) -> Result<EmailFingerprint, TokenError> {
        self.check_token_at(token, Utc::now())
    }
}
