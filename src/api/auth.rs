// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::AuthError,
    error::ApiError,
    models::{ErrorResponse, LoginRequest, TokenResponse},
    state::AppState,
};

/// Exchange a username and password for a bearer token.
///
/// Unknown usernames and wrong passwords get the same 400 response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Incorrect username or password", body = ErrorResponse),
        (status = 422, description = "Missing or mistyped fields", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(LoginRequest { username, password }) = payload?;

    // Store read + key derivation are blocking
    let authenticator = state.authenticator.clone();
    let lookup_name = username.clone();
    let record = tokio::task::spawn_blocking(move || authenticator.authenticate(&lookup_name, &password))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(AuthError::from)?;

    let Some(record) = record else {
        tracing::warn!(%username, "Login rejected");
        return Err(AuthError::InvalidCredentials.into());
    };

    let token = state.tokens.issue(&record, None)?;
    tracing::info!(username = %record.username, role = %record.role, "Token issued");

    Ok(Json(TokenResponse::bearer(token, record.role)))
}
