// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::{ActiveUser, AuthenticatedUser};
use crate::models::ErrorResponse;

/// Get the current authenticated user's information.
///
/// Any enabled account may call this.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = AuthenticatedUser),
        (status = 400, description = "Inactive user", body = ErrorResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ErrorResponse),
    )
)]
pub async fn get_current_user(ActiveUser(user): ActiveUser) -> Json<AuthenticatedUser> {
    Json(user)
}
