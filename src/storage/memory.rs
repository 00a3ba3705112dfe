// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory credential store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialRecord, CredentialStore, StoreError, StoreResult};

#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `records`.
    ///
    /// Later records with a duplicate username are ignored.
    pub fn with_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let mut users = HashMap::new();
        for record in records {
            users.entry(record.username.clone()).or_insert(record);
        }
        Self {
            users: RwLock::new(users),
        }
    }

    /// Replace (or add) a record. Used to change account state mid-session.
    pub fn put(&self, record: CredentialRecord) -> StoreResult<()> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        users.insert(record.username.clone(), record);
        Ok(())
    }

    /// Remove a record, returning it if present.
    pub fn remove(&self, username: &str) -> StoreResult<Option<CredentialRecord>> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        Ok(users.remove(username))
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("credential map lock poisoned".to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<CredentialRecord>> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(username).cloned())
    }

    fn insert(&self, record: CredentialRecord) -> StoreResult<bool> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.contains_key(&record.username) {
            return Ok(false);
        }
        users.insert(record.username.clone(), record);
        Ok(true)
    }

    fn ping(&self) -> StoreResult<()> {
        self.users.read().map(|_| ()).map_err(|_| poisoned())
    }
}
