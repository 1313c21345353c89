// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! secp256k1 public and private keys.
//!
//! A [`PublicKey`] remembers whether it prefers the compressed (33 byte) or
//! uncompressed (65 byte) SEC1 encoding. The preference only affects default
//! encoding; the wallet store always normalizes identities to the compressed
//! form before using them as row keys.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;

use super::address::{Address, LegacyAddress};
use super::error::{EccError, EccResult};
use super::hash::{ripemd160, ripemd_checksum, sha256, sha512};

const COMPRESSED_LEN: usize = 33;
const UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1 plus its preferred encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    point: k256::PublicKey,
    compressed: bool,
}

impl PublicKey {
    /// Decode a SEC1 point.
    ///
    /// Only the compressed (`0x02`/`0x03`, 33 bytes) and uncompressed (`0x04`,
    /// 65 bytes) forms are accepted. The decoded key prefers the encoding it
    /// was decoded from.
    pub fn from_bytes(bytes: &[u8]) -> EccResult<Self> {
        let compressed = match (bytes.len(), bytes.first().copied()) {
            (COMPRESSED_LEN, Some(0x02 | 0x03)) => true,
            (UNCOMPRESSED_LEN, Some(0x04)) => false,
            (len, tag) => {
                return Err(EccError::MalformedKey(format!(
                    "unsupported SEC1 encoding: {len} bytes, tag {tag:02x?}"
                )))
            }
        };

        let point = k256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| EccError::MalformedKey("point is not on the curve".to_string()))?;

        Ok(Self { point, compressed })
    }

    /// Encode the point, choosing the encoding explicitly.
    pub fn encode(&self, compressed: bool) -> Vec<u8> {
        self.point.to_encoded_point(compressed).as_bytes().to_vec()
    }

    /// Encode the point using its preferred encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode(self.compressed)
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Same point with a different encoding preference.
    pub fn with_compression(&self, compressed: bool) -> Self {
        Self {
            point: self.point.clone(),
            compressed,
        }
    }

    /// Public key string: `prefix ‖ base58(point ‖ ripemd160(point)[..4])`.
    pub fn to_public_key_string(&self, prefix: &str) -> String {
        let mut payload = self.to_bytes();
        let checksum = ripemd_checksum(&payload);
        payload.extend_from_slice(&checksum);
        format!("{prefix}{}", bs58::encode(payload).into_string())
    }

    /// Parse a public key string produced by [`Self::to_public_key_string`].
    pub fn from_public_key_string(value: &str, prefix: &str) -> EccResult<Self> {
        let body = strip_prefix(value, prefix)?;
        let payload = decode_checked(body)?;
        Self::from_bytes(&payload)
    }

    /// `ripemd160(sha512(point))` over the preferred encoding.
    pub fn to_blockchain_address(&self) -> Address {
        Address::from_bytes(ripemd160(&sha512(&self.to_bytes())))
    }

    /// Version `0x38` address with a double SHA-256 checksum.
    pub fn to_legacy_address(&self) -> LegacyAddress {
        LegacyAddress::from_hash(ripemd160(&sha256(&self.to_bytes())))
    }

    pub(crate) fn from_verifying_key(key: &VerifyingKey, compressed: bool) -> Self {
        Self {
            point: k256::PublicKey::from(key),
            compressed,
        }
    }

    pub(crate) fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from(&self.point)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: String = self.to_bytes().iter().map(|b| format!("{b:02x}")).collect();
        f.debug_struct("PublicKey")
            .field("point", &hex)
            .field("compressed", &self.compressed)
            .finish()
    }
}

/// Split `prefix` off `value`, failing with [`EccError::PrefixMismatch`].
pub(crate) fn strip_prefix<'a>(value: &'a str, prefix: &str) -> EccResult<&'a str> {
    value.strip_prefix(prefix).ok_or_else(|| EccError::PrefixMismatch {
        expected: prefix.to_string(),
        found: value.chars().take(prefix.chars().count()).collect(),
    })
}

/// Base58-decode `body` and verify its trailing 4-byte RIPEMD-160 checksum.
///
/// Returns the payload without the checksum.
pub(crate) fn decode_checked(body: &str) -> EccResult<Vec<u8>> {
    let mut raw = bs58::decode(body).into_vec()?;
    if raw.len() <= 4 {
        return Err(EccError::ChecksumMismatch);
    }
    let checksum = raw.split_off(raw.len() - 4);
    if checksum != ripemd_checksum(&raw) {
        return Err(EccError::ChecksumMismatch);
    }
    Ok(raw)
}

/// A secp256k1 signing key. Lives on the client side of the protocol; the
/// server never sees one outside of tests and tooling.
#[derive(Clone)]
pub struct PrivateKey {
    key: SigningKey,
}

impl PrivateKey {
    /// Deterministic key whose secret scalar is `sha256(seed)`.
    pub fn from_seed(seed: &[u8]) -> EccResult<Self> {
        Self::from_bytes(&sha256(seed))
    }

    pub fn from_bytes(secret: &[u8; 32]) -> EccResult<Self> {
        let key = SigningKey::from_slice(secret)
            .map_err(|_| EccError::MalformedKey("secret scalar out of range".to_string()))?;
        Ok(Self { key })
    }

    /// Public key, preferring the compressed encoding.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.key.verifying_key(), true)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}
