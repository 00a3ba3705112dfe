// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Admin-only API endpoints.
//!
//! The admin subtree is guarded by the gate middleware in the router; the
//! [`AdminOnly`] extractor re-checks the role from the state the middleware
//! attached, so handlers stay safe if mounted elsewhere.

use axum::Json;

use crate::auth::{AdminOnly, AuthenticatedUser};
use crate::models::ErrorResponse;

/// Admin dashboard entry point. Returns the calling admin.
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Admin principal", body = AuthenticatedUser),
        (status = 400, description = "Inactive user", body = ErrorResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
    )
)]
pub async fn get_reports(AdminOnly(admin): AdminOnly) -> Json<AuthenticatedUser> {
    tracing::debug!(username = %admin.username, "Admin reports accessed");
    Json(admin)
}
