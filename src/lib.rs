// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role-based Auth API - token-based authentication with role gates
//!
//! Users exchange a username and password for a signed bearer token; each
//! protected request re-validates the token, re-fetches the account and
//! passes it through the identity, active and role gates.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, password verification and the gate chain
//! - `storage` - Credential store (redb, in-memory)
//! - `config` - Environment configuration
//! - `logging` - `tracing` subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
