// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. The principal returned by
//! protected endpoints is [`crate::auth::AuthenticatedUser`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;

/// Service name reported by `/api/info`.
pub const SERVICE_NAME: &str = "Role-based Auth API";

/// Body of `POST /api/auth/login`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `bearer`
    pub token_type: String,
    #[schema(value_type = String)]
    pub role: Role,
}

impl TokenResponse {
    pub fn bearer(access_token: String, role: Role) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            role,
        }
    }
}

/// Public service information.
#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub service: String,
    pub status: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_shape() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into(), Role::Admin)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"access_token": "abc", "token_type": "bearer", "role": "admin"})
        );
    }

    #[test]
    fn login_request_debug_hides_password() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"username":"u","password":"hunter2"}"#).unwrap();
        assert!(!format!("{request:?}").contains("hunter2"));
    }
}
