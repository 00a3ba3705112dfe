// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Variants keep the internal reason for logging. The outward response
//! collapses them into a few fixed messages so callers cannot tell an
//! unknown user from a wrong password, or an expired token from a forged
//! one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::Role;
use crate::error::ApiError;
use crate::storage::StoreError;

pub const INVALID_CREDENTIALS_DETAIL: &str = "Incorrect username or password";
pub const INVALID_TOKEN_DETAIL: &str = "Could not validate credentials";
pub const INACTIVE_DETAIL: &str = "Inactive user";

/// Why a token failed validation. Never sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Not a compact JWS, bad encoding or unexpected algorithm header
    Malformed,
    /// MAC does not match the payload
    BadSignature,
    /// Embedded expiry is in the past
    Expired,
    /// `sub` or `role` absent or empty
    MissingClaims,
}

impl TokenRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::BadSignature => "bad_signature",
            TokenRejection::Expired => "expired",
            TokenRejection::MissingClaims => "missing_claims",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("authorization header is required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    #[error("invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token failed validation
    #[error("token rejected: {}", .0.as_str())]
    InvalidToken(TokenRejection),
    /// Token valid but its subject no longer exists
    #[error("token subject no longer exists")]
    UnknownSubject,
    /// Unknown username or wrong password
    #[error("invalid username or password")]
    InvalidCredentials,
    /// Account is disabled
    #[error("account is disabled")]
    InactiveAccount,
    /// Account lacks the role an endpoint requires
    #[error("role '{required}' required")]
    InsufficientRole { required: Role },
    /// Credential store failed
    #[error("credential lookup failed: {0}")]
    LookupFailure(#[from] StoreError),
    /// Token could not be produced
    #[error("token issuance failed: {0}")]
    Issuance(String),
    /// Blocking task failed or was cancelled
    #[error("internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable code for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InactiveAccount => "inactive_account",
            AuthError::InsufficientRole { .. } => "insufficient_role",
            AuthError::LookupFailure(_) => "lookup_failure",
            AuthError::Issuance(_) => "issuance_failure",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_)
            | AuthError::UnknownSubject => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials | AuthError::InactiveAccount => StatusCode::BAD_REQUEST,
            AuthError::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            AuthError::LookupFailure(_) | AuthError::Issuance(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client.
    pub fn detail(&self) -> String {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_)
            | AuthError::UnknownSubject => INVALID_TOKEN_DETAIL.to_string(),
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_DETAIL.to_string(),
            AuthError::InactiveAccount => INACTIVE_DETAIL.to_string(),
            AuthError::InsufficientRole { required } => {
                format!("{} access required", required.label())
            }
            AuthError::LookupFailure(_) | AuthError::Issuance(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = err.status_code();
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(code = err.error_code(), error = %err, "Authentication failed");
            }
            _ => {
                tracing::debug!(code = err.error_code(), reason = %err, "Request rejected");
            }
        }

        match status {
            StatusCode::UNAUTHORIZED => ApiError::unauthorized(err.detail()),
            StatusCode::BAD_REQUEST => ApiError::bad_request(err.detail()),
            StatusCode::FORBIDDEN => ApiError::forbidden(err.detail()),
            _ => ApiError::internal(err.detail()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
