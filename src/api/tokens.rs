// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    error::{ApiError, ErrorBody},
    models::{RequestCodeRequest, StatusResponse},
    state::AppState,
};

/// Issue an email token authorizing one `create_wallet`.
#[utoipa::path(
    post,
    path = "/v1/request_code",
    request_body = RequestCodeRequest,
    tag = "Tokens",
    responses(
        (status = 200, body = StatusResponse),
        (status = 400, description = "Invalid email address", body = ErrorBody),
        (status = 500, description = "Token could not be delivered", body = ErrorBody)
    )
)]
pub async fn request_code(
    State(state): State<AppState>,
    Json(request): Json<RequestCodeRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let email = request.email.trim();
    let token = state.auth_gate.issue_token(email)?;
    state.mailer.deliver(email, &token).await?;
    Ok(Json(StatusResponse::ok()))
}
