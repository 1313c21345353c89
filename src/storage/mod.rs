// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Persistence
//!
//! Transactional storage for wallet rows. The wallet store talks to the
//! [`WalletBackend`] trait; [`WalletDatabase`] implements it on redb.
//!
//! Every backend call runs exactly one transaction and touches one logical
//! row, so callers get single-row atomicity without holding locks of their
//! own. No row state is cached between calls.

pub mod backend;
pub mod error;
pub mod record;
pub mod wallet_db;

pub use backend::{InsertOutcome, SwapOutcome, WalletBackend};
pub use error::{StorageError, StorageResult};
pub use record::{RowUpdate, WalletRecord};
pub use wallet_db::WalletDatabase;
