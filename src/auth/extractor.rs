// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors that run the authorization chain.
//!
//! Pick the extractor matching the depth an endpoint needs:
//!
//! ```rust,ignore
//! async fn profile(ActiveUser(user): ActiveUser) -> Json<AuthenticatedUser> {
//!     Json(user)
//! }
//!
//! async fn reports(AdminOnly(admin): AdminOnly) -> Json<AuthenticatedUser> {
//!     Json(admin)
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::gates::{self, Active};
use super::{AuthError, AuthenticatedUser, Role};
use crate::state::AppState;

/// Valid token for an enabled account.
pub struct ActiveUser(pub AuthenticatedUser);

/// Enabled account holding the admin role.
pub struct AdminOnly(pub AuthenticatedUser);

/// Reuse the result of the gate middleware when it already ran.
fn from_middleware(parts: &Parts) -> Option<Active> {
    parts.extensions.get::<Active>().cloned()
}

/// Gates 1 and 2, or the middleware's result.
async fn active(parts: &mut Parts, state: &AppState) -> Result<Active, AuthError> {
    if let Some(active) = from_middleware(parts) {
        return Ok(active);
    }

    let token = gates::bearer_token(&parts.headers)?;
    gates::identify(&state.tokens, &state.store, token)
        .await?
        .require_active()
}

impl FromRequestParts<AppState> for ActiveUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let active = active(parts, state).await?;
        Ok(ActiveUser(active.into_user()))
    }
}

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorized = active(parts, state).await?.require_role(&Role::Admin)?;
        Ok(AdminOnly(authorized.into_user()))
    }
}
