// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistence interface used by the wallet store.

use crate::models::{ContentDigest, EmailFingerprint};

use super::{RowUpdate, StorageResult, WalletRecord};

/// Result of a constrained insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicateIdentity,
    DuplicateEmail,
}

/// Result of a compare-and-swap update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The row was rewritten; carries the new row state.
    Swapped(WalletRecord),
    NotFound,
    /// The stored digest differed from the expected one.
    Conflict { current: ContentDigest },
    /// The update moves the row to an identity another row already owns.
    IdentityTaken,
}

/// Single-row-atomic wallet storage.
///
/// Implementations must run each method as one isolated transaction: two
/// concurrent `compare_and_swap` calls expecting the same digest must never
/// both succeed, and a failed call must leave nothing behind.
pub trait WalletBackend: Send + Sync {
    fn find_by_identity(&self, identity: &str) -> StorageResult<Option<WalletRecord>>;

    fn find_by_email_fingerprint(
        &self,
        fingerprint: &EmailFingerprint,
    ) -> StorageResult<Option<WalletRecord>>;

    /// Insert unless a row with the same identity or email fingerprint exists.
    fn insert_if_absent(&self, record: &WalletRecord) -> StorageResult<InsertOutcome>;

    /// Rewrite the row stored under `identity`.
    ///
    /// With `expected = Some(d)` the update only applies while the stored
    /// digest equals `d`. `update.identity` may differ from `identity`, in
    /// which case the row moves to the new key in the same transaction.
    fn compare_and_swap(
        &self,
        identity: &str,
        expected: Option<&ContentDigest>,
        update: RowUpdate,
    ) -> StorageResult<SwapOutcome>;

    /// Remove a row. Returns the removed row, or `None` if there was none.
    fn delete(&self, identity: &str) -> StorageResult<Option<WalletRecord>>;

    /// Cheap check that storage is reachable.
    fn health_check(&self) -> StorageResult<()>;
}
