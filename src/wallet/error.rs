// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet store outcomes other than success.

use axum::http::StatusCode;

use crate::ecc::EccError;
use crate::storage::StorageError;

/// Terminal failure of a wallet operation.
///
/// Every variant except [`WalletError::Storage`] is a caller outcome and is
/// reported verbatim. Storage faults are the only retriable category.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Key or signature bytes could not be decoded.
    #[error("{0}")]
    Key(#[from] EccError),

    #[error("signature does not authenticate the request")]
    Unauthorized,

    #[error("no wallet stored for this key")]
    NotFound,

    #[error("wallet was modified since it was last read")]
    Conflict,

    #[error("a wallet already exists for this key or email")]
    Duplicate,

    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl WalletError {
    /// HTTP status of this outcome. Its canonical reason phrase is the
    /// outcome tag reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WalletError::Key(_) | WalletError::Duplicate => StatusCode::BAD_REQUEST,
            WalletError::Unauthorized => StatusCode::UNAUTHORIZED,
            WalletError::NotFound => StatusCode::NOT_FOUND,
            WalletError::Conflict => StatusCode::CONFLICT,
            WalletError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WalletError::Key(err) => err.error_code(),
            WalletError::Unauthorized => "unauthorized",
            WalletError::NotFound => "not_found",
            WalletError::Conflict => "conflict",
            WalletError::Duplicate => "duplicate",
            WalletError::Storage(_) => "internal_error",
        }
    }
}

pub type WalletResult<T> = Result<T, WalletError>;
