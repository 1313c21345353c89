// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::TokenError;
use crate::ecc::EccError;
use crate::wallet::WalletError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: &'static str,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    pub error: String,
    pub error_code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "rate_limited", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal server error",
        )
    }

    /// An undecodable request field.
    pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_field",
            format!("invalid {field}: {reason}"),
        )
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        // Storage faults are logged by the store.
        if let WalletError::Storage(_) = err {
            return ApiError::internal();
        }
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        if let TokenError::Delivery(reason) = &err {
            tracing::error!(reason = %reason, "Email token delivery failed");
            return Self::new(err.status_code(), err.error_code(), "failed to deliver token");
        }
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<EccError> for ApiError {
    fn from(err: EccError) -> Self {
        WalletError::Key(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            status: self.status.as_u16(),
            status_text: self
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            error: self.message,
            error_code: self.code.to_string(),
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn wallet_outcomes_map_to_statuses() {
        let cases = [
            (WalletError::Unauthorized, StatusCode::UNAUTHORIZED),
            (WalletError::NotFound, StatusCode::NOT_FOUND),
            (WalletError::Conflict, StatusCode::CONFLICT),
            (WalletError::Duplicate, StatusCode::BAD_REQUEST),
            (
                WalletError::Key(EccError::ChecksumMismatch),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, status) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
        }
    }

    #[test]
    fn storage_faults_hide_details() {
        let err = WalletError::Storage(crate::storage::StorageError::DanglingIndex("GPHx".into()));
        let api = ApiError::from(err);
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("GPHx"));
    }

    #[test]
    fn delivery_failures_hide_details() {
        let api = ApiError::from(TokenError::Delivery("/usr/bin/send-token: exit 3".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, "delivery_failed");
        assert!(!api.message.contains("send-token"));
    }

    #[test]
    fn token_errors_keep_their_status() {
        let api = ApiError::from(TokenError::Expired);
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.code, "token_expired");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::from(WalletError::Conflict).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["status"], 409);
        assert_eq!(body["statusText"], "Conflict");
        assert_eq!(body["error_code"], "conflict");
    }
}
