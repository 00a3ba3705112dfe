// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and validation.
//!
//! Tokens are compact JWS strings signed with HMAC-SHA256 (`HS256`) under a
//! server-held secret. The payload is exactly `{sub, role, exp}`.
//!
//! Validation is strict:
//! - only `HS256` headers are accepted
//! - expiry is compared against the server clock with no leeway
//! - `sub` and `role` must be present and non-empty

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Deserialize;

use super::{AuthError, ClaimSet, Role, TokenRejection};
use crate::storage::CredentialRecord;

/// TTL applied when the caller does not pass one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Claims as read back from a token. Fields default so a missing claim is
/// reported as such rather than as a parse failure.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    role: String,
    exp: i64,
}

/// Signs and verifies bearer tokens with one symmetric key.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec for `secret` issuing tokens valid for `ttl_minutes`.
    ///
    /// A TTL too large for a `Duration` saturates; issuing then fails with
    /// [`AuthError::Issuance`].
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl: Duration::try_minutes(ttl_minutes).unwrap_or(Duration::MAX),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for an authenticated record.
    ///
    /// `ttl` falls back to the configured default. A negative TTL yields an
    /// already expired token.
    pub fn issue(&self, record: &CredentialRecord, ttl: Option<Duration>) -> Result<String, AuthError> {
        if record.username.is_empty() || record.role.is_empty() {
            return Err(AuthError::Issuance(
                "subject and role must be non-empty".to_string(),
            ));
        }

        let claims = ClaimSet::for_record(record, Utc::now(), ttl.unwrap_or(self.default_ttl))
            .ok_or_else(|| AuthError::Issuance("token expiry out of range".to_string()))?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Issuance(e.to_string()))
    }

    /// Verify signature, algorithm and expiry, and return the claims.
    pub fn validate(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let token_data = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let rejection = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                    ErrorKind::MissingRequiredClaim(_) => TokenRejection::MissingClaims,
                    _ => TokenRejection::Malformed,
                };
                AuthError::InvalidToken(rejection)
            })?;

        let raw = token_data.claims;
        if raw.sub.is_empty() || raw.role.is_empty() {
            return Err(AuthError::InvalidToken(TokenRejection::MissingClaims));
        }

        Ok(ClaimSet {
            sub: raw.sub,
            role: Role::from(raw.role),
            exp: raw.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde::Serialize;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";

    fn record(username: &str, role: Role) -> CredentialRecord {
        CredentialRecord {
            username: username.to_string(),
            hashed_password: "unused".to_string(),
            role,
            disabled: false,
            full_name: None,
        }
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_MINUTES)
    }

    fn rejection(result: Result<ClaimSet, AuthError>) -> TokenRejection {
        match result {
            Err(AuthError::InvalidToken(reason)) => reason,
            other => panic!("expected InvalidToken, got {other:?}"),
        }
    }

    #[test]
    fn issue_then_validate_round_trip() {
        let codec = codec();
        for (name, role) in [
            ("admin@example.com", Role::Admin),
            ("user@example.com", Role::User),
            ("ops@example.com", Role::from("operator")),
        ] {
            let token = codec.issue(&record(name, role.clone()), None).unwrap();
            let claims = codec.validate(&token).unwrap();
            assert_eq!(claims.sub, name);
            assert_eq!(claims.role, role);
        }
    }

    #[test]
    fn default_ttl_sets_expiry() {
        let before = Utc::now().timestamp();
        let token = codec().issue(&record("a", Role::User), None).unwrap();
        let claims = codec().validate(&token).unwrap();
        let after = Utc::now().timestamp();

        assert!(claims.exp >= before + DEFAULT_TOKEN_TTL_MINUTES * 60);
        assert!(claims.exp <= after + DEFAULT_TOKEN_TTL_MINUTES * 60);
    }

    #[test]
    fn oversized_ttl_fails_issuance_without_panicking() {
        let huge = TokenCodec::new(TEST_SECRET, 200_000_000_000);
        assert!(matches!(
            huge.issue(&record("a", Role::User), None),
            Err(AuthError::Issuance(_))
        ));

        let saturated = TokenCodec::new(TEST_SECRET, i64::MAX);
        assert_eq!(saturated.default_ttl(), Duration::MAX);
        assert!(matches!(
            saturated.issue(&record("a", Role::User), None),
            Err(AuthError::Issuance(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let token = codec
            .issue(&record("a", Role::User), Some(Duration::minutes(-1)))
            .unwrap();
        assert_eq!(rejection(codec.validate(&token)), TokenRejection::Expired);
    }

    #[test]
    fn every_modified_character_is_detected() {
        let codec = codec();
        let token = codec.issue(&record("user@example.com", Role::User), None).unwrap();

        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert!(
                matches!(codec.validate(&tampered), Err(AuthError::InvalidToken(_))),
                "tampered token accepted at byte {index}"
            );
        }
    }

    #[test]
    fn wrong_secret_fails_signature() {
        let token = codec().issue(&record("a", Role::User), None).unwrap();
        let other = TokenCodec::new(b"another-secret-key-for-jwt-testing-32chars", 30);
        assert_eq!(rejection(other.validate(&token)), TokenRejection::BadSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec();
        for token in ["", "invalid.token.here", "a.b", "not a token at all"] {
            assert_eq!(rejection(codec.validate(token)), TokenRejection::Malformed);
        }
    }

    #[test]
    fn other_algorithms_are_rejected() {
        #[derive(Serialize)]
        struct Full<'a> {
            sub: &'a str,
            role: &'a str,
            exp: i64,
        }
        let claims = Full {
            sub: "admin@example.com",
            role: "admin",
            exp: Utc::now().timestamp() + 600,
        };

        // Same secret, different MAC
        let hs512 = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();
        assert!(codec().validate(&hs512).is_err());

        // Unsigned token
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let unsigned = format!("{header}.{payload}.");
        assert_eq!(rejection(codec().validate(&unsigned)), TokenRejection::Malformed);
    }

    #[test]
    fn missing_or_empty_claims_are_rejected() {
        #[derive(Serialize)]
        struct SubOnly<'a> {
            sub: &'a str,
            exp: i64,
        }
        #[derive(Serialize)]
        struct Empty<'a> {
            sub: &'a str,
            role: &'a str,
            exp: i64,
        }
        let key = EncodingKey::from_secret(TEST_SECRET);
        let exp = Utc::now().timestamp() + 600;

        let no_role = encode(&Header::default(), &SubOnly { sub: "a", exp }, &key).unwrap();
        assert_eq!(rejection(codec().validate(&no_role)), TokenRejection::MissingClaims);

        let empty_sub = encode(
            &Header::default(),
            &Empty {
                sub: "",
                role: "admin",
                exp,
            },
            &key,
        )
        .unwrap();
        assert_eq!(rejection(codec().validate(&empty_sub)), TokenRejection::MissingClaims);
    }

    #[test]
    fn issue_requires_subject_and_role() {
        let codec = codec();
        assert!(matches!(
            codec.issue(&record("", Role::User), None),
            Err(AuthError::Issuance(_))
        ));
        assert!(matches!(
            codec.issue(&record("a", Role::from("")), None),
            Err(AuthError::Issuance(_))
        ));
    }
}
