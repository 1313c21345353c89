// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The wallet state machine.
//!
//! Signatures are recovered and verified on the calling task. Each storage
//! call then runs on the blocking pool as exactly one backend transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::ecc::{PublicKey, RecoverableSignature};
use crate::models::{ContentDigest, EmailFingerprint};
use crate::storage::{
    InsertOutcome, RowUpdate, StorageError, StorageResult, SwapOutcome, WalletBackend,
    WalletRecord,
};

use super::error::{WalletError, WalletResult};
use super::signer::authenticate;

/// Result of a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateReceipt {
    pub content_digest: ContentDigest,
    pub created_at: DateTime<Utc>,
}

/// Result of a successful save or password change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReceipt {
    pub content_digest: ContentDigest,
    pub updated_at: DateTime<Utc>,
}

/// Result of a conditional fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No wallet, or the caller already holds the stored version.
    NotModified,
    Found(WalletRecord),
}

/// Authenticated wallet operations over a [`WalletBackend`].
#[derive(Clone)]
pub struct WalletStore {
    backend: Arc<dyn WalletBackend>,
    prefix: String,
}

impl WalletStore {
    pub fn new(backend: Arc<dyn WalletBackend>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Public key string prefix identities are rendered with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Run one backend call on the blocking pool.
    async fn with_backend<T, F>(&self, op: F) -> WalletResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn WalletBackend) -> StorageResult<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let result = tokio::task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(StorageError::from)?;
        result.map_err(|e| {
            tracing::error!(error = %e, "Wallet storage failure");
            WalletError::Storage(e)
        })
    }

    /// Store a new wallet owned by whoever signed `sha256(encrypted_blob)`.
    pub async fn create_wallet(
        &self,
        encrypted_blob: Vec<u8>,
        signature: &RecoverableSignature,
        email_fingerprint: EmailFingerprint,
    ) -> WalletResult<CreateReceipt> {
        let digest = ContentDigest::of(&encrypted_blob);
        let identity = authenticate(digest.as_bytes(), signature, &self.prefix)?;

        let record = WalletRecord::new(identity, email_fingerprint, encrypted_blob, Utc::now());
        let receipt = CreateReceipt {
            content_digest: *record.content_digest(),
            created_at: record.created_at(),
        };
        let identity = record.identity().to_string();

        match self
            .with_backend(move |backend| backend.insert_if_absent(&record))
            .await?
        {
            InsertOutcome::Inserted => {
                tracing::info!(identity = %identity, "Wallet created");
                Ok(receipt)
            }
            outcome => {
                tracing::debug!(identity = %identity, ?outcome, "Wallet create refused");
                Err(WalletError::Duplicate)
            }
        }
    }

    /// Conditional, unauthenticated read.
    ///
    /// `public_key` may use either point encoding; rows are keyed by the
    /// compressed form.
    pub async fn fetch_wallet(
        &self,
        public_key: &str,
        local_hash: Option<&ContentDigest>,
    ) -> WalletResult<FetchOutcome> {
        let identity = PublicKey::from_public_key_string(public_key, &self.prefix)?
            .with_compression(true)
            .to_public_key_string(&self.prefix);

        let found = self
            .with_backend(move |backend| backend.find_by_identity(&identity))
            .await?;

        Ok(match found {
            Some(record) if Some(record.content_digest()) != local_hash => {
                FetchOutcome::Found(record)
            }
            _ => FetchOutcome::NotModified,
        })
    }

    /// Replace the blob while the stored digest still equals
    /// `original_local_hash`.
    pub async fn save_wallet(
        &self,
        original_local_hash: &ContentDigest,
        encrypted_blob: Vec<u8>,
        signature: &RecoverableSignature,
    ) -> WalletResult<UpdateReceipt> {
        let digest = ContentDigest::of(&encrypted_blob);
        let identity = authenticate(digest.as_bytes(), signature, &self.prefix)?;

        let expected = *original_local_hash;
        let key = identity.clone();
        let update = RowUpdate {
            identity: identity.clone(),
            encrypted_blob,
        };
        let outcome = self
            .with_backend(move |backend| backend.compare_and_swap(&key, Some(&expected), update))
            .await?;

        let receipt = finish_swap(outcome)?;
        tracing::info!(identity = %identity, "Wallet saved");
        Ok(receipt)
    }

    /// Re-key a wallet.
    ///
    /// `original_signature` signs the stored digest itself and names the
    /// current owner. `new_signature` signs `sha256(new_encrypted_blob)` and
    /// names the owner after the change, which may be the same key.
    pub async fn change_password(
        &self,
        original_local_hash: &ContentDigest,
        original_signature: &RecoverableSignature,
        new_encrypted_blob: Vec<u8>,
        new_signature: &RecoverableSignature,
    ) -> WalletResult<UpdateReceipt> {
        let old_identity = authenticate(
            original_local_hash.as_bytes(),
            original_signature,
            &self.prefix,
        )?;
        let new_digest = ContentDigest::of(&new_encrypted_blob);
        let new_identity = authenticate(new_digest.as_bytes(), new_signature, &self.prefix)?;

        let update = RowUpdate {
            identity: new_identity.clone(),
            encrypted_blob: new_encrypted_blob,
        };
        let from = old_identity.clone();
        let outcome = self
            .with_backend(move |backend| backend.compare_and_swap(&from, None, update))
            .await?;

        let receipt = finish_swap(outcome)?;
        tracing::info!(
            old_identity = %old_identity,
            new_identity = %new_identity,
            "Wallet password changed"
        );
        Ok(receipt)
    }

    /// Remove the wallet owned by whoever signed `local_hash`.
    pub async fn delete_wallet(
        &self,
        local_hash: &ContentDigest,
        signature: &RecoverableSignature,
    ) -> WalletResult<()> {
        let identity = authenticate(local_hash.as_bytes(), signature, &self.prefix)?;

        let key = identity.clone();
        match self
            .with_backend(move |backend| backend.delete(&key))
            .await?
        {
            Some(_) => {
                tracing::info!(identity = %identity, "Wallet deleted");
                Ok(())
            }
            None => Err(WalletError::NotFound),
        }
    }

    /// Storage reachability, for readiness probes.
    pub async fn health_check(&self) -> WalletResult<()> {
        self.with_backend(|backend| backend.health_check()).await
    }
}

fn finish_swap(outcome: SwapOutcome) -> WalletResult<UpdateReceipt> {
    match outcome {
        SwapOutcome::Swapped(record) => Ok(UpdateReceipt {
            content_digest: *record.content_digest(),
            updated_at: record.updated_at(),
        }),
        SwapOutcome::NotFound => Err(WalletError::NotFound),
        SwapOutcome::Conflict { current } => {
            tracing::debug!(current = ?current, "Wallet update conflict");
            Err(WalletError::Conflict)
        }
        SwapOutcome::IdentityTaken => Err(WalletError::Duplicate),
    }
}

// =============================================================================
// Tests
// =============================================================================
