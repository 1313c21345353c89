// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    ecc::RecoverableSignature,
    encoding,
    error::{ApiError, ErrorBody},
    models::{
        ChangePasswordRequest, ContentDigest, CreateWalletRequest, CreateWalletResponse,
        DeleteWalletRequest, FetchWalletQuery, SaveWalletRequest, StatusResponse,
        UpdateWalletResponse, WalletResponse,
    },
    state::AppState,
    wallet::{FetchOutcome, UpdateReceipt},
};

fn decode_bytes(field: &str, value: &str) -> Result<Vec<u8>, ApiError> {
    encoding::decode(value).map_err(|e| ApiError::invalid_field(field, e))
}

fn decode_digest(field: &str, value: &str) -> Result<ContentDigest, ApiError> {
    let bytes = decode_bytes(field, value)?;
    ContentDigest::from_slice(&bytes)
        .ok_or_else(|| ApiError::invalid_field(field, "expected a 32-byte digest"))
}

fn decode_signature(field: &str, value: &str) -> Result<RecoverableSignature, ApiError> {
    let bytes = decode_bytes(field, value)?;
    Ok(RecoverableSignature::from_bytes(&bytes)?)
}

fn update_response(receipt: UpdateReceipt) -> Json<UpdateWalletResponse> {
    Json(UpdateWalletResponse {
        local_hash: receipt.content_digest.to_base64(),
        updated: receipt.updated_at,
    })
}

#[utoipa::path(
    post,
    path = "/v1/create_wallet",
    request_body = CreateWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = CreateWalletResponse),
        (status = 400, description = "Undecodable field, or a wallet already exists for this key or email", body = ErrorBody),
        (status = 401, description = "Email token rejected", body = ErrorBody)
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<Json<CreateWalletResponse>, ApiError> {
    let email_fingerprint = state.auth_gate.check_token(&request.code)?;
    let encrypted_blob = decode_bytes("encrypted_data", &request.encrypted_data)?;
    let signature = decode_signature("signature", &request.signature)?;

    let receipt = state
        .wallets
        .create_wallet(encrypted_blob, &signature, email_fingerprint)
        .await?;

    Ok(Json(CreateWalletResponse {
        local_hash: receipt.content_digest.to_base64(),
        created: receipt.created_at,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/fetch_wallet",
    params(FetchWalletQuery),
    tag = "Wallet",
    responses(
        (status = 200, body = WalletResponse),
        (status = 304, description = "No wallet, or the caller already holds the stored version"),
        (status = 400, description = "Malformed public key or digest", body = ErrorBody)
    )
)]
pub async fn fetch_wallet(
    State(state): State<AppState>,
    Query(query): Query<FetchWalletQuery>,
) -> Result<Response, ApiError> {
    let local_hash = query
        .local_hash
        .as_deref()
        .map(|value| decode_digest("local_hash", value))
        .transpose()?;

    match state
        .wallets
        .fetch_wallet(&query.public_key, local_hash.as_ref())
        .await?
    {
        FetchOutcome::NotModified => Ok(StatusCode::NOT_MODIFIED.into_response()),
        FetchOutcome::Found(record) => Ok(Json(WalletResponse {
            public_key: record.identity().to_string(),
            local_hash: record.content_digest().to_base64(),
            encrypted_data: encoding::encode(record.encrypted_blob()),
            created: record.created_at(),
            updated: record.updated_at(),
        })
        .into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/v1/save_wallet",
    request_body = SaveWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = UpdateWalletResponse),
        (status = 404, description = "No wallet for the signing key", body = ErrorBody),
        (status = 409, description = "Wallet changed since original_local_hash", body = ErrorBody)
    )
)]
pub async fn save_wallet(
    State(state): State<AppState>,
    Json(request): Json<SaveWalletRequest>,
) -> Result<Json<UpdateWalletResponse>, ApiError> {
    let original = decode_digest("original_local_hash", &request.original_local_hash)?;
    let encrypted_blob = decode_bytes("encrypted_data", &request.encrypted_data)?;
    let signature = decode_signature("signature", &request.signature)?;

    let receipt = state
        .wallets
        .save_wallet(&original, encrypted_blob, &signature)
        .await?;
    Ok(update_response(receipt))
}

#[utoipa::path(
    post,
    path = "/v1/change_password",
    request_body = ChangePasswordRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = UpdateWalletResponse),
        (status = 400, description = "New key already owns a wallet", body = ErrorBody),
        (status = 404, description = "No wallet for the original key", body = ErrorBody)
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<UpdateWalletResponse>, ApiError> {
    let original = decode_digest("original_local_hash", &request.original_local_hash)?;
    let original_signature = decode_signature("original_signature", &request.original_signature)?;
    let new_blob = decode_bytes("new_encrypted_data", &request.new_encrypted_data)?;
    let new_signature = decode_signature("new_signature", &request.new_signature)?;

    let receipt = state
        .wallets
        .change_password(&original, &original_signature, new_blob, &new_signature)
        .await?;
    Ok(update_response(receipt))
}

#[utoipa::path(
    post,
    path = "/v1/delete_wallet",
    request_body = DeleteWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = StatusResponse),
        (status = 404, description = "No wallet for the signing key", body = ErrorBody)
    )
)]
pub async fn delete_wallet(
    State(state): State<AppState>,
    Json(request): Json<DeleteWalletRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let local_hash = decode_digest("local_hash", &request.local_hash)?;
    let signature = decode_signature("signature", &request.signature)?;

    state.wallets.delete_wallet(&local_hash, &signature).await?;
    Ok(Json(StatusResponse::ok()))
}
