// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hash-based address formats derived from a public key.
//!
//! Neither format is used to authenticate requests. They identify a key for
//! display and lookup only. The two formats use different checksums and are
//! kept as distinct types so they cannot be mixed up.

use std::fmt;
use std::str::FromStr;

use super::error::{EccError, EccResult};
use super::hash::{double_sha256, ripemd_checksum};
use super::key::{decode_checked, strip_prefix};

/// Version byte of [`LegacyAddress`] (56 decimal).
pub const LEGACY_VERSION: u8 = 0x38;

/// `ripemd160(sha512(point))`: a 20-byte key identifier without checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// `prefix ‖ base58(address ‖ ripemd160(address)[..4])`.
    pub fn to_address_string(&self, prefix: &str) -> String {
        let mut payload = self.0.to_vec();
        payload.extend_from_slice(&ripemd_checksum(&self.0));
        format!("{prefix}{}", bs58::encode(payload).into_string())
    }

    pub fn from_address_string(value: &str, prefix: &str) -> EccResult<Self> {
        let body = strip_prefix(value, prefix)?;
        let payload = decode_checked(body)?;
        let bytes: [u8; 20] = payload.as_slice().try_into().map_err(|_| {
            EccError::MalformedKey(format!("address must be 20 bytes, got {}", payload.len()))
        })?;
        Ok(Self(bytes))
    }
}

/// Version-byte address with a double SHA-256 checksum:
/// `base58(0x38 ‖ ripemd160(sha256(point)) ‖ sha256d(..)[..4])`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegacyAddress {
    hash: [u8; 20],
}

impl LegacyAddress {
    pub fn from_hash(hash: [u8; 20]) -> Self {
        Self { hash }
    }

    pub fn hash(&self) -> &[u8; 20] {
        &self.hash
    }

    fn payload(&self) -> [u8; 21] {
        let mut payload = [0u8; 21];
        payload[0] = LEGACY_VERSION;
        payload[1..].copy_from_slice(&self.hash);
        payload
    }
}

impl fmt::Display for LegacyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = self.payload();
        let checksum = double_sha256(&payload);
        let mut raw = payload.to_vec();
        raw.extend_from_slice(&checksum[..4]);
        f.write_str(&bs58::encode(raw).into_string())
    }
}

impl FromStr for LegacyAddress {
    type Err = EccError;

    fn from_str(value: &str) -> EccResult<Self> {
        let raw = bs58::decode(value).into_vec()?;
        if raw.len() != 25 {
            return Err(EccError::ChecksumMismatch);
        }
        let (payload, checksum) = raw.split_at(21);
        if checksum != &double_sha256(payload)[..4] {
            return Err(EccError::ChecksumMismatch);
        }
        if payload[0] != LEGACY_VERSION {
            return Err(EccError::PrefixMismatch {
                expected: format!("{LEGACY_VERSION:#04x}"),
                found: format!("{:#04x}", payload[0]),
            });
        }
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(Self { hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::hash::{ripemd160, sha256, sha512};
    use crate::ecc::PrivateKey;

    const PREFIX: &str = "GPH";
    const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    fn tamper(value: &str, index: usize) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let original = chars[index];
        chars[index] = BASE58_ALPHABET.chars().find(|c| *c != original).unwrap();
        chars.into_iter().collect()
    }

    #[test]
    fn blockchain_address_is_ripemd_of_sha512() {
        let key = PrivateKey::from_seed(b"").unwrap().public_key();
        let expected = ripemd160(&sha512(&key.to_bytes()));
        assert_eq!(key.to_blockchain_address().as_bytes(), &expected);
    }

    #[test]
    fn address_string_round_trip() {
        let address = PrivateKey::from_seed(b"2")
            .unwrap()
            .public_key()
            .to_blockchain_address();
        let encoded = address.to_address_string(PREFIX);
        let decoded = Address::from_address_string(&encoded, PREFIX).unwrap();
        assert_eq!(decoded, address);
        assert_eq!(decoded.to_address_string(PREFIX), encoded);
    }

    #[test]
    fn address_string_detects_tampering() {
        let encoded = PrivateKey::from_seed(b"")
            .unwrap()
            .public_key()
            .to_blockchain_address()
            .to_address_string(PREFIX);
        for index in 0..encoded.chars().count() {
            let err = Address::from_address_string(&tamper(&encoded, index), PREFIX).unwrap_err();
            assert!(
                matches!(
                    err,
                    EccError::ChecksumMismatch | EccError::PrefixMismatch { .. }
                ),
                "index {index}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn legacy_address_layout() {
        let key = PrivateKey::from_seed(b"").unwrap().public_key();
        let address = key.to_legacy_address();
        assert_eq!(address.hash(), &ripemd160(&sha256(&key.to_bytes())));

        let raw = bs58::decode(address.to_string()).into_vec().unwrap();
        assert_eq!(raw.len(), 25);
        assert_eq!(raw[0], LEGACY_VERSION);
        assert_eq!(&raw[21..], &double_sha256(&raw[..21])[..4]);
    }

    #[test]
    fn legacy_address_round_trip_and_tampering() {
        let address = PrivateKey::from_seed(b"nobody")
            .unwrap()
            .public_key()
            .to_legacy_address();
        let encoded = address.to_string();
        assert_eq!(encoded.parse::<LegacyAddress>().unwrap(), address);

        for index in 0..encoded.chars().count() {
            let err = tamper(&encoded, index).parse::<LegacyAddress>().unwrap_err();
            assert!(
                matches!(
                    err,
                    EccError::ChecksumMismatch | EccError::PrefixMismatch { .. }
                ),
                "index {index}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn legacy_checksum_differs_from_ripemd_checksum() {
        let address = PrivateKey::from_seed(b"")
            .unwrap()
            .public_key()
            .to_legacy_address();
        let payload = address.payload();
        assert_ne!(double_sha256(&payload)[..4], ripemd_checksum(&payload));
    }
}
