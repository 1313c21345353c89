// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Store
//!
//! One encrypted blob per identity, where the identity is the compressed
//! public key string of whoever signed the request.
//!
//! ## Lifecycle
//!
//! ```text
//! absent --create--> present --save/change_password--> present
//!                       |
//!                       +--delete--> absent
//! ```
//!
//! A save names the content digest it is based on and fails with `Conflict`
//! once that digest is no longer the stored one.

pub mod error;
pub mod signer;
pub mod store;

pub use error::{WalletError, WalletResult};
pub use signer::authenticate;
pub use store::{CreateReceipt, FetchOutcome, UpdateReceipt, WalletStore};
