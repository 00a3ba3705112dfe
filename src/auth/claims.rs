// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Role;
use crate::storage::CredentialRecord;

/// Token payload.
///
/// Only built from a record that has just passed password verification, and
/// never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (username)
    pub sub: String,
    /// Role at issuance time
    pub role: Role,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
}

impl ClaimSet {
    /// Claims for `record` expiring `ttl` after `now`.
    ///
    /// `None` when the expiry is not representable.
    pub fn for_record(record: &CredentialRecord, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            sub: record.username.clone(),
            role: record.role.clone(),
            exp: expires_at.timestamp(),
        })
    }
}

/// Authenticated user information for the current request.
///
/// Built from the store record fetched after token validation, so
/// `disabled` and `role` reflect current account state rather than what the
/// token says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Login name
    pub username: String,
    /// Display name
    pub full_name: Option<String>,
    /// Whether the account is disabled
    pub disabled: Option<bool>,
    /// Current role
    #[schema(value_type = String)]
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    pub fn has_role(&self, required: &Role) -> bool {
        &self.role == required
    }
}

impl From<CredentialRecord> for AuthenticatedUser {
    fn from(record: CredentialRecord) -> Self {
        Self {
            username: record.username,
            full_name: record.full_name,
            disabled: Some(record.disabled),
            role: record.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CredentialRecord {
        CredentialRecord {
            username: "admin@example.com".to_string(),
            hashed_password: "$pbkdf2-sha256$secret".to_string(),
            role: Role::Admin,
            disabled: false,
            full_name: Some("Admin User".to_string()),
        }
    }

    #[test]
    fn claims_carry_subject_role_and_expiry() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = ClaimSet::for_record(&sample_record(), now, Duration::minutes(30)).unwrap();
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, 1_700_000_000 + 30 * 60);
    }

    #[test]
    fn unrepresentable_expiry_yields_none() {
        let now = Utc::now();
        assert!(ClaimSet::for_record(&sample_record(), now, Duration::MAX).is_none());
        assert!(
            ClaimSet::for_record(&sample_record(), now, Duration::minutes(200_000_000_000)).is_none()
        );
    }

    #[test]
    fn claims_never_serialize_password_hash() {
        let claims = ClaimSet::for_record(&sample_record(), Utc::now(), Duration::minutes(5)).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn user_from_record_drops_hash() {
        let user = AuthenticatedUser::from(sample_record());
        assert_eq!(user.username, "admin@example.com");
        assert_eq!(user.full_name.as_deref(), Some("Admin User"));
        assert!(!user.is_disabled());
        assert!(user.has_role(&Role::Admin));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn has_role_is_exact() {
        let mut record = sample_record();
        record.role = Role::User;
        let user = AuthenticatedUser::from(record);
        assert!(user.has_role(&Role::User));
        assert!(!user.has_role(&Role::Admin));
    }
}
