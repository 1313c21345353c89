// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Base64 transfer encoding for binary fields.
//!
//! Binary values (blobs, digests, signatures) are carried as standard padded
//! base64 both on the wire and inside stored JSON records.

use base64ct::{Base64, Encoding};

pub fn encode(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

pub fn decode(value: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64::decode_vec(value)
}

/// `#[serde(with = "crate::encoding::base64_bytes")]` for `Vec<u8>` fields.
pub mod base64_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::decode(&value).map_err(de::Error::custom)
    }
}
