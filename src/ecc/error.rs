// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key codec and signature errors.
//!
//! Every variant describes bad caller input. None of them is retriable.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EccError {
    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("expected prefix {expected:?}, found {found:?}")]
    PrefixMismatch { expected: String, found: String },

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    #[error("recovered point is not on the curve")]
    PointNotOnCurve,

    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

impl EccError {
    /// Stable machine-readable code for API error bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            EccError::MalformedKey(_) => "malformed_key",
            EccError::ChecksumMismatch => "checksum_mismatch",
            EccError::PrefixMismatch { .. } => "prefix_mismatch",
            EccError::InvalidBase58(_) => "invalid_base58",
            EccError::InvalidRecoveryId(_) => "invalid_recovery_id",
            EccError::PointNotOnCurve => "point_not_on_curve",
            EccError::MalformedSignature(_) => "malformed_signature",
        }
    }
}

impl From<bs58::decode::Error> for EccError {
    fn from(e: bs58::decode::Error) -> Self {
        EccError::InvalidBase58(e.to_string())
    }
}

pub type EccResult<T> = Result<T, EccError>;
