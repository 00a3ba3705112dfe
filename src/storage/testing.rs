// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles shared by unit tests across modules.

use super::{CredentialRecord, CredentialStore, StoreError, StoreResult};

/// Store whose every call fails, standing in for an unreachable database.
pub struct FailingStore;

fn refused() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

impl CredentialStore for FailingStore {
    fn find_by_username(&self, _username: &str) -> StoreResult<Option<CredentialRecord>> {
        Err(refused())
    }

    fn insert(&self, _record: CredentialRecord) -> StoreResult<bool> {
        Err(refused())
    }

    fn ping(&self) -> StoreResult<()> {
        Err(refused())
    }
}
