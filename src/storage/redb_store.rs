// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: username → serialized CredentialRecord (JSON bytes)

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{CredentialRecord, CredentialStore, StoreError, StoreResult};

/// Primary table: username → serialized CredentialRecord (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Embedded credential database.
///
/// The handle is reference counted; clones share one open database, which
/// redb allows concurrent read transactions against.
#[derive(Clone)]
pub struct RedbCredentialStore {
    db: Arc<Database>,
}

impl RedbCredentialStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Credential database opened");

        Ok(Self { db: Arc::new(db) })
    }
}

impl CredentialStore for RedbCredentialStore {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(username)? {
            Some(value) => {
                let record: CredentialRecord = serde_json::from_slice(value.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn insert(&self, record: CredentialRecord) -> StoreResult<bool> {
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        let inserted = {
            let mut table = write_txn.open_table(USERS)?;
            if table.get(record.username.as_str())?.is_some() {
                false
            } else {
                table.insert(record.username.as_str(), json.as_slice())?;
                true
            }
        };
        write_txn.commit()?;
        Ok(inserted)
    }

    fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }
}
