// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # secp256k1 Key and Signature Protocol
//!
//! Encoding, address formats and recoverable signatures used to authenticate
//! wallet requests. Curve arithmetic itself comes from `k256`; this module
//! only defines the wire formats and the recovery/verification protocol on
//! top of it.
//!
//! ## Formats
//!
//! | Form | Layout |
//! |------|--------|
//! | Public key string | `prefix ‖ base58(point ‖ ripemd160(point)[..4])` |
//! | Blockchain address | `ripemd160(sha512(point))` (20 bytes) |
//! | Address string | `prefix ‖ base58(address ‖ ripemd160(address)[..4])` |
//! | Legacy address | `base58(0x38 ‖ ripemd160(sha256(point)) ‖ sha256d(..)[..4])` |
//! | Signature | `header ‖ r ‖ s` (65 bytes, `header = 27 + recid + 4·compressed`) |

pub mod address;
pub mod error;
pub mod hash;
pub mod key;
pub mod signature;

pub use address::{Address, LegacyAddress};
pub use error::{EccError, EccResult};
pub use key::{PrivateKey, PublicKey};
pub use signature::{RecoverableSignature, RecoveryCandidate};
