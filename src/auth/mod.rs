// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Password login, bearer token issuance and the role-gated authorization
//! chain.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{username, password}` to `/api/auth/login`
//! 2. [`Authenticator`] looks the account up and verifies the password
//! 3. [`TokenCodec`] issues an HS256 token carrying `sub`, `role`, `exp`
//! 4. Client sends `Authorization: Bearer <token>` on later requests
//! 5. The gates in [`gates`] validate the token, re-read the account and
//!    check it is enabled and, where required, holds a role
//!
//! ## Security
//!
//! - Unknown users and wrong passwords produce the same response and cost
//! - Token failures (malformed, forged, expired) produce the same 401
//! - Tokens expire exactly at `exp`, no clock skew allowance
//! - Account state (`disabled`, role) is always read fresh from the store

pub mod authenticator;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod gates;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use authenticator::Authenticator;
pub use claims::{AuthenticatedUser, ClaimSet};
pub use error::{AuthError, TokenRejection};
pub use extractor::{ActiveUser, AdminOnly};
pub use gates::{Active, Authorized, Identified, Requirement};
pub use middleware::{require_gates, GateLayer};
pub use roles::Role;
pub use token::{TokenCodec, DEFAULT_TOKEN_TTL_MINUTES};
