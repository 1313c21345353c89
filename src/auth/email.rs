// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Email fingerprints.
//!
//! Wallets are bound to an email without storing the address: only
//! `sha256(normalize(email))` is kept.

use unicode_normalization::UnicodeNormalization;

use crate::ecc::hash::sha256;
use crate::models::EmailFingerprint;

use super::error::TokenError;

/// Trim, NFKC-normalize and lowercase an address.
///
/// Rejects anything without exactly one `@` separating a non-empty local
/// part from a domain containing a dot, or containing whitespace.
pub fn normalize_email(email: &str) -> Result<String, TokenError> {
    let normalized: String = email.trim().nfkc().collect::<String>().to_lowercase();

    let (local, domain) = normalized
        .split_once('@')
        .ok_or(TokenError::InvalidEmail)?;
    let valid = !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !normalized.chars().any(char::is_whitespace);

    if valid {
        Ok(normalized)
    } else {
        Err(TokenError::InvalidEmail)
    }
}

pub fn email_fingerprint(email: &str) -> Result<EmailFingerprint, TokenError> {
    let normalized = normalize_email(email)?;
    Ok(EmailFingerprint::from_bytes(sha256(normalized.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_spellings_share_a_fingerprint() {
        let a = email_fingerprint("alice@example.com").unwrap();
        assert_eq!(email_fingerprint("  Alice@Example.COM ").unwrap(), a);
        // Fullwidth characters fold under NFKC.
        assert_eq!(email_fingerprint("ａlice@example.com").unwrap(), a);
        assert_ne!(email_fingerprint("bob@example.com").unwrap(), a);
    }

    #[test]
    fn rejects_invalid_addresses() {
        for email in [
            "",
            "alice",
            "@example.com",
            "alice@",
            "alice@localhost",
            "a b@example.com",
            "a@b@example.com",
            "alice@example.",
        ] {
            assert_eq!(
                email_fingerprint(email).unwrap_err(),
                TokenError::InvalidEmail,
                "{email:?}"
            );
        }
    }
}
