// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The persisted wallet row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encoding::base64_bytes;
use crate::models::{ContentDigest, EmailFingerprint};

/// One stored wallet.
///
/// Fields are private so the blob and its digest can only change together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    identity: String,
    email_fingerprint: EmailFingerprint,
    #[serde(with = "base64_bytes")]
    encrypted_blob: Vec<u8>,
    content_digest: ContentDigest,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// New identity and blob for an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub identity: String,
    pub encrypted_blob: Vec<u8>,
}

impl WalletRecord {
    pub fn new(
        identity: String,
        email_fingerprint: EmailFingerprint,
        encrypted_blob: Vec<u8>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            identity,
            email_fingerprint,
            content_digest: ContentDigest::of(&encrypted_blob),
            encrypted_blob,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn email_fingerprint(&self) -> &EmailFingerprint {
        &self.email_fingerprint
    }

    pub fn encrypted_blob(&self) -> &[u8] {
        &self.encrypted_blob
    }

    pub fn content_digest(&self) -> &ContentDigest {
        &self.content_digest
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply an update as one transition: identity, blob, digest and
    /// timestamp change together.
    pub(crate) fn apply(&mut self, update: RowUpdate, now: DateTime<Utc>) {
        self.content_digest = ContentDigest::of(&update.encrypted_blob);
        self.encrypted_blob = update.encrypted_blob;
        self.identity = update.identity;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint() -> EmailFingerprint {
        EmailFingerprint::from_bytes([9; 32])
    }

    #[test]
    fn new_record_digest_matches_blob() {
        let now = Utc::now();
        let record = WalletRecord::new("GPHid".into(), fingerprint(), b"data".to_vec(), now);
        assert_eq!(record.content_digest(), &ContentDigest::of(b"data"));
        assert_eq!(record.created_at(), record.updated_at());
    }

    #[test]
    fn apply_keeps_digest_in_step_with_blob() {
        let created = Utc::now();
        let mut record = WalletRecord::new("GPHold".into(), fingerprint(), b"data".to_vec(), created);
        let later = created + chrono::Duration::seconds(5);

        record.apply(
            RowUpdate {
                identity: "GPHnew".into(),
                encrypted_blob: b"data2".to_vec(),
            },
            later,
        );

        assert_eq!(record.identity(), "GPHnew");
        assert_eq!(record.encrypted_blob(), b"data2");
        assert_eq!(record.content_digest(), &ContentDigest::of(b"data2"));
        assert_eq!(record.created_at(), created);
        assert_eq!(record.updated_at(), later);
        assert_eq!(record.email_fingerprint(), &fingerprint());
    }

    #[test]
    fn json_round_trip() {
        let record = WalletRecord::new("GPHid".into(), fingerprint(), vec![0, 255, 7], Utc::now());
        let json = serde_json::to_vec(&record).unwrap();
        let back: WalletRecord = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, record);
    }
}
