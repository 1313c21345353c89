// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded wallet database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `wallets`: public key string → serialized WalletRecord
//! - `email_index`: email fingerprint → public key string
//!
//! redb runs one write transaction at a time, so every read-compare-write
//! below is serializable. A transaction that is not committed is aborted.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{ContentDigest, EmailFingerprint};

use super::{
    InsertOutcome, RowUpdate, StorageError, StorageResult, SwapOutcome, WalletBackend,
    WalletRecord,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: identity → serialized WalletRecord (JSON bytes).
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Unique index: email fingerprint → identity.
const EMAIL_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("email_index");

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "wallets.redb";

// =============================================================================
// WalletDatabase
// =============================================================================

/// Embedded ACID wallet database.
pub struct WalletDatabase {
    db: Database,
}

impl WalletDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Wallet database opened");
        Ok(Self { db })
    }

    /// Open `wallets.redb` inside `data_dir`.
    pub fn open_in(data_dir: &Path) -> StorageResult<Self> {
        Self::open(&data_dir.join(DATABASE_FILE))
    }
}

fn decode(bytes: &[u8]) -> StorageResult<WalletRecord> {
    Ok(serde_json::from_slice(bytes)?)
}

impl WalletBackend for WalletDatabase {
    fn find_by_identity(&self, identity: &str) -> StorageResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(identity)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_by_email_fingerprint(
        &self,
        fingerprint: &EmailFingerprint,
    ) -> StorageResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(EMAIL_INDEX)?;
        let identity = match index.get(fingerprint.as_bytes().as_slice())? {
            Some(value) => value.value().to_string(),
            None => return Ok(None),
        };

        let wallets = read_txn.open_table(WALLETS)?;
        match wallets.get(identity.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Err(StorageError::DanglingIndex(identity)),
        }
    }

    fn insert_if_absent(&self, record: &WalletRecord) -> StorageResult<InsertOutcome> {
        let json = serde_json::to_vec(record)?;
        let fingerprint = record.email_fingerprint().as_bytes().as_slice();

        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut wallets = write_txn.open_table(WALLETS)?;
            let mut index = write_txn.open_table(EMAIL_INDEX)?;

            if wallets.get(record.identity())?.is_some() {
                InsertOutcome::DuplicateIdentity
            } else if index.get(fingerprint)?.is_some() {
                InsertOutcome::DuplicateEmail
            } else {
                wallets.insert(record.identity(), json.as_slice())?;
                index.insert(fingerprint, record.identity())?;
                InsertOutcome::Inserted
            }
        };

        if outcome == InsertOutcome::Inserted {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(outcome)
    }

    fn compare_and_swap(
        &self,
        identity: &str,
        expected: Option<&ContentDigest>,
        update: RowUpdate,
    ) -> StorageResult<SwapOutcome> {
        let write_txn = self.db.begin_write()?;
        let outcome = 'swap: {
            let mut wallets = write_txn.open_table(WALLETS)?;
            let mut index = write_txn.open_table(EMAIL_INDEX)?;

            // Read existing value and deserialize before mutating
            let existing = wallets.get(identity)?.map(|value| value.value().to_vec());
            let Some(existing) = existing else {
                break 'swap SwapOutcome::NotFound;
            };
            let mut record = decode(&existing)?;

            if let Some(expected) = expected {
                if record.content_digest() != expected {
                    break 'swap SwapOutcome::Conflict {
                        current: *record.content_digest(),
                    };
                }
            }

            let moves = update.identity != identity;
            if moves && wallets.get(update.identity.as_str())?.is_some() {
                break 'swap SwapOutcome::IdentityTaken;
            }

            record.apply(update, Utc::now());
            let json = serde_json::to_vec(&record)?;

            if moves {
                wallets.remove(identity)?;
                index.insert(
                    record.email_fingerprint().as_bytes().as_slice(),
                    record.identity(),
                )?;
            }
            wallets.insert(record.identity(), json.as_slice())?;

            SwapOutcome::Swapped(record)
        };

        if matches!(outcome, SwapOutcome::Swapped(_)) {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(outcome)
    }

    fn delete(&self, identity: &str) -> StorageResult<Option<WalletRecord>> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut wallets = write_txn.open_table(WALLETS)?;
            let mut index = write_txn.open_table(EMAIL_INDEX)?;

            let existing = wallets.remove(identity)?.map(|value| value.value().to_vec());
            match existing {
                Some(bytes) => {
                    let record = decode(&bytes)?;
                    index.remove(record.email_fingerprint().as_bytes().as_slice())?;
                    Some(record)
                }
                None => None,
            }
        };

        if removed.is_some() {
            write_txn.commit()?;
        } else {
            write_txn.abort()?;
        }
        Ok(removed)
    }

    fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(WALLETS)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
