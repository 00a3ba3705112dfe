// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Storage
//!
//! Account records live behind the [`CredentialStore`] trait. The
//! authentication core only ever performs a point lookup by username;
//! insertion exists for seeding and tests.
//!
//! ## Implementations
//!
//! - [`RedbCredentialStore`] - embedded ACID database (`redb`), used by the
//!   server binary
//! - [`InMemoryCredentialStore`] - `HashMap` behind a lock, used by tests and
//!   ephemeral runs
//!
//! Implementations are synchronous. Async callers move lookups onto the
//! blocking pool (see `auth::gates`).

pub mod memory;
pub mod redb_store;
pub mod seed;
#[cfg(test)]
pub mod testing;

use serde::{Deserialize, Serialize};

use crate::auth::Role;

pub use memory::InMemoryCredentialStore;
pub use redb_store::RedbCredentialStore;
pub use seed::{seed_demo_users, DemoAccount, SeedError, DEMO_ACCOUNTS};

/// Stored account record.
///
/// Field names follow the existing user documents (`hashed_password`,
/// `full_name`), so exported records load without translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Unique login name
    pub username: String,
    /// Output of the one-way password hash
    pub hashed_password: String,
    /// Account role
    pub role: Role,
    /// Disabled accounts authenticate but fail the active gate
    #[serde(default)]
    pub disabled: bool,
    /// Optional display name
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account persistence consumed by the authentication core.
pub trait CredentialStore: Send + Sync {
    /// Point lookup keyed on the unique username.
    fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>>;

    /// Insert a record unless the username is taken.
    ///
    /// Returns `false` (and leaves the stored record alone) when it is.
    fn insert(&self, record: CredentialRecord) -> StoreResult<bool>;

    /// Liveness probe run before the store is reported ready.
    fn ping(&self) -> StoreResult<()>;
}
