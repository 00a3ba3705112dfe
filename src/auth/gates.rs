// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization chain.
//!
//! A request passes three ordered gates, each consuming the previous gate's
//! output:
//!
//! ```text
//! bearer token ──identify──▶ Identified ──require_active──▶ Active ──require_role(r)──▶ Authorized
//!                   │                          │                          │
//!                   ▼                          ▼                          ▼
//!          InvalidToken / UnknownSubject  InactiveAccount          InsufficientRole
//!                 (401)                       (400)                      (403)
//! ```
//!
//! The gate states are distinct types, so a handler holding an [`Authorized`]
//! user is guaranteed the active gate ran first. Endpoints pick the depth
//! they need through [`Requirement`].
//!
//! ## Source of truth
//!
//! After the token is validated the account is re-read from the store.
//! Both the `disabled` flag and the role compared by the role gate come from
//! that fresh record, never from the token, so disabling an account or
//! changing its role takes effect on the next request.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::{AuthError, AuthenticatedUser, Role, TokenCodec};
use crate::storage::CredentialStore;

/// How deep into the chain an endpoint requires a request to get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Valid token for an existing account
    Identified,
    /// ... and the account is not disabled
    Active,
    /// ... and the account holds this role
    Role(Role),
}

/// Gate 1 passed: token valid and subject exists.
#[derive(Debug, Clone)]
pub struct Identified(AuthenticatedUser);

/// Gate 2 passed: account is enabled.
#[derive(Debug, Clone)]
pub struct Active(AuthenticatedUser);

/// Gate 3 passed: account holds the required role.
#[derive(Debug, Clone)]
pub struct Authorized(AuthenticatedUser);

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Gate 1: validate the token and re-fetch the account it names.
///
/// The store read runs on the blocking pool. If the caller is dropped
/// mid-lookup the result is discarded with it.
pub async fn identify(
    codec: &TokenCodec,
    store: &Arc<dyn CredentialStore>,
    token: &str,
) -> Result<Identified, AuthError> {
    let claims = codec.validate(token)?;

    let store = Arc::clone(store);
    let subject = claims.sub.clone();
    let record = tokio::task::spawn_blocking(move || store.find_by_username(&subject))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))??
        .ok_or(AuthError::UnknownSubject)?;

    if record.role != claims.role {
        tracing::debug!(
            username = %record.username,
            token_role = %claims.role,
            current_role = %record.role,
            "Role changed since token issuance, using current role"
        );
    }

    Ok(Identified(AuthenticatedUser::from(record)))
}

impl Identified {
    pub fn into_user(self) -> AuthenticatedUser {
        self.0
    }

    /// Gate 2: reject disabled accounts.
    pub fn require_active(self) -> Result<Active, AuthError> {
        if self.0.is_disabled() {
            return Err(AuthError::InactiveAccount);
        }
        Ok(Active(self.0))
    }
}

impl Active {
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }

    pub fn into_user(self) -> AuthenticatedUser {
        self.0
    }

    /// Gate 3: require an exact role match.
    pub fn require_role(self, required: &Role) -> Result<Authorized, AuthError> {
        if !self.0.has_role(required) {
            return Err(AuthError::InsufficientRole {
                required: required.clone(),
            });
        }
        Ok(Authorized(self.0))
    }
}

impl Authorized {
    pub fn into_user(self) -> AuthenticatedUser {
        self.0
    }
}

/// Run the chain from a raw token up to `requirement`.
pub async fn authorize(
    codec: &TokenCodec,
    store: &Arc<dyn CredentialStore>,
    token: &str,
    requirement: &Requirement,
) -> Result<AuthenticatedUser, AuthError> {
    let identified = identify(codec, store, token).await?;
    let active = match requirement {
        Requirement::Identified => return Ok(identified.into_user()),
        _ => identified.require_active()?,
    };
    match requirement {
        Requirement::Role(role) => Ok(active.require_role(role)?.into_user()),
        _ => Ok(active.into_user()),
    }
}
