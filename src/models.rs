// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Shared value types and the request/response structures used by the REST
//! API. API types derive `Serialize`, `Deserialize` and `ToSchema` for JSON
//! handling and OpenAPI documentation.
//!
//! ## Binary Fields
//!
//! Binary request fields are base64 strings on the wire. The API layer
//! decodes them into the fixed-size newtypes below before anything reaches
//! the wallet store.
//!
//! ## Field Names
//!
//! Wire names (`local_hash`, `encrypted_data`, `public_key`) are kept
//! stable for existing wallet clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use utoipa::{IntoParams, ToSchema};

use crate::ecc::hash::sha256;
use crate::encoding;

// =============================================================================
// Digest Types
// =============================================================================

macro_rules! digest_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; 32]);

        impl $name {
            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// `None` unless `bytes` is exactly 32 bytes long.
            pub fn from_slice(bytes: &[u8]) -> Option<Self> {
                bytes.try_into().ok().map(Self)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_base64(&self) -> String {
                encoding::encode(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_base64())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_base64())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                let bytes = encoding::decode(&value).map_err(de::Error::custom)?;
                Self::from_slice(&bytes)
                    .ok_or_else(|| de::Error::invalid_length(bytes.len(), &"32 bytes"))
            }
        }
    };
}

digest_newtype!(
    /// `sha256(encrypted_blob)`: integrity check and optimistic-concurrency token.
    ContentDigest
);

digest_newtype!(
    /// `sha256` of a normalized email address. Binds a wallet to one email
    /// without storing the address itself.
    EmailFingerprint
);

impl ContentDigest {
    /// Digest of a blob. The only way a stored digest is ever produced.
    pub fn of(blob: &[u8]) -> Self {
        Self(sha256(blob))
    }
}

// =============================================================================
// Wallet Requests
// =============================================================================

/// Request an email token that authorizes creating one wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestCodeRequest {
    /// Email address the token is sent to.
    pub email: String,
}

/// Create a wallet. The signer of `encrypted_data` becomes its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    /// Token received by email (base58).
    pub code: String,
    /// Encrypted wallet blob (base64).
    pub encrypted_data: String,
    /// 65-byte recoverable signature over `sha256(encrypted_data)` (base64).
    pub signature: String,
}

/// Conditional fetch parameters.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
pub struct FetchWalletQuery {
    /// Public key string of the wallet owner.
    pub public_key: String,
    /// Digest the client already holds (base64). Omit for recovery.
    #[serde(default)]
    pub local_hash: Option<String>,
}

/// Replace the stored blob, guarded by the digest the client last saw.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveWalletRequest {
    /// Digest of the blob the update is based on (base64).
    pub original_local_hash: String,
    /// New encrypted wallet blob (base64).
    pub encrypted_data: String,
    /// Signature over `sha256(encrypted_data)` (base64).
    pub signature: String,
}

/// Re-key a wallet after a password change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    /// Digest of the currently stored blob (base64).
    pub original_local_hash: String,
    /// Old key's signature over `original_local_hash` itself (base64).
    pub original_signature: String,
    /// Blob encrypted under the new password (base64).
    pub new_encrypted_data: String,
    /// New key's signature over `sha256(new_encrypted_data)` (base64).
    pub new_signature: String,
}

/// Delete a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteWalletRequest {
    /// Digest of the stored blob (base64).
    pub local_hash: String,
    /// Signature over `local_hash` itself (base64).
    pub signature: String,
}

// =============================================================================
// Wallet Responses
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateWalletResponse {
    /// Digest of the stored blob (base64).
    pub local_hash: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UpdateWalletResponse {
    /// Digest of the stored blob (base64).
    pub local_hash: String,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletResponse {
    pub public_key: String,
    /// Digest of the stored blob (base64).
    pub local_hash: String,
    /// Encrypted wallet blob (base64).
    pub encrypted_data: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Body for outcomes that carry nothing but a status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
        }
    }
}
