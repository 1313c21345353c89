// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Email token errors.

use axum::http::StatusCode;

/// Email token error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token is not base58 or has the wrong length
    #[error("token is malformed")]
    Malformed,
    /// Token MAC does not match
    #[error("token signature is invalid")]
    BadSignature,
    /// Token lifetime has passed
    #[error("token has expired")]
    Expired,
    /// Address cannot receive a token
    #[error("invalid email address")]
    InvalidEmail,
    /// Token could not be handed to the mailer
    #[error("failed to deliver token: {0}")]
    Delivery(String),
}

impl TokenError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed_token",
            TokenError::BadSignature => "invalid_signature",
            TokenError::Expired => "token_expired",
            TokenError::InvalidEmail => "invalid_email",
            TokenError::Delivery(_) => "delivery_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenError::Malformed | TokenError::InvalidEmail => StatusCode::BAD_REQUEST,
            TokenError::BadSignature | TokenError::Expired => StatusCode::UNAUTHORIZED,
            TokenError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
